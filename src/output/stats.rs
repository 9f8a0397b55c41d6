//! Statistics generation from the article archive
//!
//! This module provides functionality for extracting and displaying
//! archive statistics from the storage layer.

use crate::storage::{ArticleStore, RunRecord, StorageResult};

/// How many category and publisher rows are printed
const TOP_ROWS: usize = 10;

/// Archive statistics summary
#[derive(Debug, Clone)]
pub struct ArchiveStatistics {
    /// Total number of stored articles
    pub total_articles: u64,

    /// Article counts per category, largest first
    pub by_category: Vec<(String, u64)>,

    /// Article counts per publisher, largest first
    pub by_publisher: Vec<(String, u64)>,

    /// The most recent crawl run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ArchiveStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn ArticleStore) -> StorageResult<ArchiveStatistics> {
    Ok(ArchiveStatistics {
        total_articles: storage.count_articles()?,
        by_category: storage.count_by_category()?,
        by_publisher: storage.count_by_publisher()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ArchiveStatistics) {
    println!("=== Archive Statistics ===\n");

    println!("Overview:");
    println!("  Total articles: {}", stats.total_articles);
    println!("  Categories: {}", stats.by_category.len());
    println!("  Publishers: {}", stats.by_publisher.len());
    println!();

    print_breakdown("Articles by Category", &stats.by_category, stats.total_articles);
    print_breakdown("Top Publishers", &stats.by_publisher, stats.total_articles);

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run (#{}):", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!(
                "  Seeds fetched: {}, links found: {}, articles collected: {}",
                run.counts.seeds_fetched, run.counts.links_found, run.counts.articles_collected
            );
            println!(
                "  Rows inserted: {}, updated: {}, failed: {}",
                run.counts.rows_inserted, run.counts.rows_updated, run.counts.rows_failed
            );
            if let Some(message) = &run.error_message {
                println!("  Error: {}", message);
            }
        }
        None => println!("No crawl runs recorded yet"),
    }
}

fn print_breakdown(heading: &str, rows: &[(String, u64)], total: u64) {
    if rows.is_empty() {
        return;
    }

    println!("{}:", heading);
    for (name, count) in rows.iter().take(TOP_ROWS) {
        println!("  {}: {} ({:.1}%)", name, count, percentage(*count, total));
    }
    if rows.len() > TOP_ROWS {
        println!("  ... and {} more", rows.len() - TOP_ROWS);
    }
    println!();
}

fn percentage(count: u64, total: u64) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
