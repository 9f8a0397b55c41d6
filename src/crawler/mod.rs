//! Crawler module for page fetching and article collection
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Article link discovery on seed pages
//! - Article field extraction
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod links;

pub use coordinator::{Coordinator, CrawlOutcome, CrawlStats};
pub use extractor::{ArticleExtractor, MissingField};
pub use fetcher::{build_http_client, FetchFailure, Fetcher, RetryPolicy};
pub use links::{merge_unique, LinkExtractor};

use crate::config::Config;
use crate::storage::{
    open_storage, persist_articles, ArticleStore, PersistOutcome, RunCounts, StorageError,
    StorageResult,
};
use crate::NewsError;
use chrono::{DateTime, Utc};
use scraper::Selector;
use std::path::Path;
use thiserror::Error;

/// Summary of a finished pipeline run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: i64,
    pub stats: CrawlStats,
    pub persisted: PersistOutcome,
}

/// A crawl whose records could not be stored
///
/// The collected records travel with the error so the caller can still
/// report or retry them.
#[derive(Debug, Error)]
#[error("{source} ({} collected articles not saved)", .outcome.records.len())]
pub struct PersistFailure {
    pub outcome: CrawlOutcome,
    #[source]
    pub source: StorageError,
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Fetch the seed pages and collect article links
/// 2. Fetch and extract the article pages
/// 3. Open the archive and record the run
/// 4. Upsert the collected records
///
/// Storage is opened only after the crawl has finished.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, stored with the run
///
/// # Returns
///
/// * `Ok(RunReport)` - The pipeline completed, possibly with zero records
/// * `Err(NewsError)` - Setup failed, or storage failed after the crawl
///   ([`NewsError::Persist`] carries the collected records)
pub async fn crawl(config: &Config, config_hash: &str) -> Result<RunReport, NewsError> {
    let started_at = Utc::now();

    let mut coordinator = Coordinator::new(config)?;
    let outcome = coordinator.run().await?;

    let (run_id, persisted) = match record_run(config, config_hash, started_at, &outcome) {
        Ok(recorded) => recorded,
        Err(source) => {
            let failure = PersistFailure { outcome, source };
            return Err(NewsError::Persist(Box::new(failure)));
        }
    };

    Ok(RunReport {
        run_id,
        stats: outcome.stats,
        persisted,
    })
}

/// Storage half of a run: ledger entry, upsert, ledger completion
fn record_run(
    config: &Config,
    config_hash: &str,
    started_at: DateTime<Utc>,
    outcome: &CrawlOutcome,
) -> StorageResult<(i64, PersistOutcome)> {
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let run_id = storage.create_run(config_hash, started_at)?;

    let persisted = match persist_articles(&mut storage, &outcome.records) {
        Ok(persisted) => persisted,
        Err(e) => {
            if let Err(mark_err) = storage.fail_run(run_id, &e.to_string()) {
                tracing::warn!("Could not mark run {} as failed: {}", run_id, mark_err);
            }
            return Err(e);
        }
    };

    let report = persisted.report();
    let counts = RunCounts {
        seeds_fetched: outcome.stats.seeds_fetched as u64,
        links_found: outcome.stats.links_found as u64,
        articles_collected: outcome.stats.records_extracted as u64,
        rows_inserted: report.map_or(0, |r| r.inserted),
        rows_updated: report.map_or(0, |r| r.updated),
        rows_failed: report.map_or(0, |r| r.failures.len() as u64),
    };
    storage.complete_run(run_id, &counts)?;

    Ok((run_id, persisted))
}

/// Compiles one of the fixed CSS probes
pub(crate) fn compile_selector(selector: &'static str) -> Result<Selector, NewsError> {
    Selector::parse(selector).map_err(|e| NewsError::Selector {
        selector,
        message: e.to_string(),
    })
}
