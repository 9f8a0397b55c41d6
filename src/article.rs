//! Article record definitions
//!
//! An [`Article`] is created once per successfully parsed article page and is
//! never mutated afterwards. Records live only for the duration of one run;
//! durability is the job of the storage layer.

use chrono::{DateTime, Utc};

/// Placeholder publisher used when no logo or author tag resolves
pub const UNKNOWN_PUBLISHER: &str = "unknown publisher";

/// Placeholder reporter used when the page carries no byline
pub const UNKNOWN_REPORTER: &str = "unknown reporter";

/// Placeholder category used when the page carries no category label
pub const DEFAULT_CATEGORY: &str = "misc";

/// A fully extracted news article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Headline, never empty
    pub title: String,

    /// Body text blocks joined with newlines (may be empty)
    pub content: String,

    /// Publisher name or [`UNKNOWN_PUBLISHER`]
    pub publisher: String,

    /// Byline text or [`UNKNOWN_REPORTER`]
    pub reporter: String,

    /// Publication timestamp as printed by the source
    pub published_at: String,

    /// Absolute article URL, the unique key in storage
    pub url: String,

    /// Section label or [`DEFAULT_CATEGORY`]
    pub category: String,

    /// Representative image, if the page declares one
    pub thumbnail_url: Option<String>,

    /// Wall-clock time the page was parsed
    pub crawled_at: DateTime<Utc>,
}

