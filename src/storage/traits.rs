//! Storage traits and error types
//!
//! This module defines the trait interface for article archives and the
//! associated error types.

use crate::article::Article;
use crate::storage::{RunCounts, RunRecord, UpsertReport};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that abort a storage operation as a whole
///
/// Failures of individual rows inside a batch are not errors at this level;
/// they are reported through [`UpsertReport::failures`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for article archive implementations
pub trait ArticleStore {
    // ===== Articles =====

    /// Inserts or updates articles keyed by URL, as one batch
    ///
    /// A row whose URL already exists has every other field overwritten.
    /// Rows that fail for any other reason are skipped and listed in the
    /// report; the rest of the batch still commits.
    fn upsert_articles(&mut self, articles: &[Article]) -> StorageResult<UpsertReport>;

    /// Gets an article by URL
    fn get_article_by_url(&self, url: &str) -> StorageResult<Option<Article>>;

    /// Gets total article count
    fn count_articles(&self) -> StorageResult<u64>;

    /// Article counts per category, largest first
    fn count_by_category(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Article counts per publisher, largest first
    fn count_by_publisher(&self) -> StorageResult<Vec<(String, u64)>>;

    // ===== Run Ledger =====

    /// Records the start of a crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    /// * `started_at` - When the crawl began
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str, started_at: DateTime<Utc>) -> StorageResult<i64>;

    /// Marks a run as completed and stores its counters
    fn complete_run(&mut self, run_id: i64, counts: &RunCounts) -> StorageResult<()>;

    /// Marks a run as failed with an error message
    fn fail_run(&mut self, run_id: i64, message: &str) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
