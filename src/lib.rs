//! News-Harvest: a news portal article harvester
//!
//! This crate fetches a news portal's section pages, discovers article links,
//! extracts structured article fields and upserts them into a SQLite archive.

pub mod article;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for News-Harvest operations
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid header value for {name}: {message}")]
    InvalidHeader { name: &'static str, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Storage error: {0}")]
    Persist(Box<crawler::PersistFailure>),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },

    #[error("Invalid stage transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlStage,
        to: state::CrawlStage,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid article pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for News-Harvest operations
pub type Result<T> = std::result::Result<T, NewsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use article::Article;
pub use config::Config;
pub use crawler::{crawl, CrawlOutcome, CrawlStats, FetchFailure, PersistFailure, RunReport};
pub use state::CrawlStage;
pub use storage::{PersistOutcome, UpsertReport};
