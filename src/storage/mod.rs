//! Storage module for persisting harvested articles
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Idempotent bulk upserts of articles keyed by URL
//! - The crawl run ledger

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{ArticleStore, StorageError, StorageResult};

use crate::article::Article;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to open or initialize the database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A row that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub url: String,
    pub error: String,
}

/// Result of one upsert batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertReport {
    /// Rows whose URL was new
    pub inserted: u64,

    /// Rows whose URL already existed and were overwritten
    pub updated: u64,

    /// Rows skipped because of an error unrelated to the URL key
    pub failures: Vec<RowFailure>,
}

impl UpsertReport {
    /// Inserted plus updated rows
    pub fn rows_affected(&self) -> u64 {
        self.inserted + self.updated
    }
}

/// Outcome of handing a record list to the persister
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The record list was empty; the store was not touched
    NothingToPersist,

    /// The batch was applied
    Applied(UpsertReport),
}

impl PersistOutcome {
    pub fn rows_affected(&self) -> u64 {
        match self {
            Self::NothingToPersist => 0,
            Self::Applied(report) => report.rows_affected(),
        }
    }

    pub fn report(&self) -> Option<&UpsertReport> {
        match self {
            Self::NothingToPersist => None,
            Self::Applied(report) => Some(report),
        }
    }
}

/// Persists a run's records
///
/// An empty list is a no-op reported as [`PersistOutcome::NothingToPersist`].
/// Otherwise the records are upserted as one batch; per-row failures are
/// logged and counted, fatal store errors are returned.
pub fn persist_articles(
    store: &mut dyn ArticleStore,
    articles: &[Article],
) -> StorageResult<PersistOutcome> {
    if articles.is_empty() {
        tracing::info!("Nothing to persist");
        return Ok(PersistOutcome::NothingToPersist);
    }

    let report = store.upsert_articles(articles)?;

    for failure in &report.failures {
        tracing::warn!("Skipped row {}: {}", failure.url, failure.error);
    }
    tracing::info!(
        "Persisted {} of {} articles ({} new, {} updated, {} failed)",
        report.rows_affected(),
        articles.len(),
        report.inserted,
        report.updated,
        report.failures.len()
    );

    Ok(PersistOutcome::Applied(report))
}

/// Counters stored with a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub seeds_fetched: u64,
    pub links_found: u64,
    pub articles_collected: u64,
    pub rows_inserted: u64,
    pub rows_updated: u64,
    pub rows_failed: u64,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub counts: RunCounts,
    pub error_message: Option<String>,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(url: &str, title: &str) -> Article {
        Article {
            title: title.to_string(),
            content: "Body".to_string(),
            publisher: "Yonhap".to_string(),
            reporter: "Kim".to_string(),
            published_at: "2025-03-01 09:30:00".to_string(),
            url: url.to_string(),
            category: "Politics".to_string(),
            thumbnail_url: None,
            crawled_at: Utc::now(),
        }
    }

    #[test]
    fn test_run_status_roundtrip() {
        for status in &[RunStatus::Running, RunStatus::Completed, RunStatus::Failed] {
            let db_str = status.to_db_string();
            assert_eq!(Some(*status), RunStatus::from_db_string(db_str));
        }
    }

    #[test]
    fn test_run_status_invalid() {
        assert_eq!(RunStatus::from_db_string("invalid"), None);
    }

    #[test]
    fn test_persist_empty_is_nothing_to_persist() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let outcome = persist_articles(&mut storage, &[]).unwrap();

        assert_eq!(outcome, PersistOutcome::NothingToPersist);
        assert_eq!(outcome.rows_affected(), 0);
        assert!(outcome.report().is_none());
        assert_eq!(storage.count_articles().unwrap(), 0);
    }

    #[test]
    fn test_persist_twice_is_idempotent() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let batch = vec![
            article("https://n.news.naver.com/article/001/1", "One"),
            article("https://n.news.naver.com/article/001/2", "Two"),
        ];

        let first = persist_articles(&mut storage, &batch).unwrap();
        let second = persist_articles(&mut storage, &batch).unwrap();

        assert_eq!(first.report().unwrap().inserted, 2);
        assert_eq!(second.report().unwrap().inserted, 0);
        assert_eq!(second.report().unwrap().updated, 2);
        assert_eq!(storage.count_articles().unwrap(), 2);
    }

    #[test]
    fn test_persist_reports_row_failures_without_aborting() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let batch = vec![
            article("https://n.news.naver.com/article/001/1", "One"),
            article("https://n.news.naver.com/article/001/2", ""),
            article("https://n.news.naver.com/article/001/3", "Three"),
        ];

        let outcome = persist_articles(&mut storage, &batch).unwrap();
        let report = outcome.report().unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "https://n.news.naver.com/article/001/2");
        assert_eq!(outcome.rows_affected(), 2);
        assert_eq!(storage.count_articles().unwrap(), 2);
    }
}
