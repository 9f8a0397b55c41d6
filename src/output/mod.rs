//! Output module for run summaries and archive reports
//!
//! This module handles:
//! - Rendering the summary of a finished run
//! - Archive statistics for the `--stats` mode

pub mod stats;

pub use stats::{load_statistics, print_statistics, ArchiveStatistics};

use crate::crawler::RunReport;
use crate::storage::PersistOutcome;

/// Renders the end-of-run summary printed by the CLI
pub fn format_run_summary(report: &RunReport) -> String {
    let stats = &report.stats;
    let mut lines = vec![
        format!("=== Run #{} Summary ===", report.run_id),
        format!(
            "Seed pages fetched: {} / {}",
            stats.seeds_fetched, stats.seeds_requested
        ),
        format!("Article links found: {}", stats.links_found),
        format!(
            "Article pages fetched: {} ({} failed)",
            stats.articles_fetched, stats.article_fetch_failures
        ),
        format!(
            "Records extracted: {} ({} rejected)",
            stats.records_extracted, stats.records_rejected
        ),
    ];

    match &report.persisted {
        PersistOutcome::NothingToPersist => {
            lines.push("No articles collected, nothing saved".to_string());
        }
        PersistOutcome::Applied(upsert) => {
            lines.push(format!(
                "Saved {} articles ({} new, {} updated)",
                upsert.rows_affected(),
                upsert.inserted,
                upsert.updated
            ));
            if !upsert.failures.is_empty() {
                lines.push(format!("Rows that failed: {}", upsert.failures.len()));
                for failure in &upsert.failures {
                    lines.push(format!("  - {}: {}", failure.url, failure.error));
                }
            }
        }
    }

    lines.join("\n")
}
