//! News-Harvest main entry point
//!
//! This is the command-line interface for the News-Harvest article collector.

use clap::Parser;
use news_harvest::config::{load_config_with_hash, Config};
use news_harvest::crawler::crawl;
use news_harvest::output::format_run_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// News-Harvest: a news portal article collector
///
/// News-Harvest fetches a portal's section pages, follows the article links
/// it finds there, extracts each article's fields and upserts them into a
/// SQLite archive keyed by article URL.
#[derive(Parser, Debug)]
#[command(name = "news-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A news portal article collector", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("news_harvest=info,warn"),
            1 => EnvFilter::new("news_harvest=debug,info"),
            2 => EnvFilter::new("news_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== News-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Concurrency limit: {}", config.crawler.concurrency_limit);
    println!("  Fetch attempts: {}", config.crawler.fetch_retries);
    println!(
        "  Retry base delay: {}ms",
        config.crawler.retry_base_delay_ms
    );
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);

    println!("\nHTTP Headers:");
    println!("  User-Agent: {}", config.http.user_agent);
    println!("  Accept-Language: {}", config.http.accept_language);
    println!("  Referer: {}", config.http.referer);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nArticle pattern: {}", config.source.article_pattern);
    println!("\nSeed Pages ({}):", config.source.seeds.len());
    for seed in &config.source.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.source.seeds.len()
    );
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use news_harvest::output::{load_statistics, print_statistics};
    use news_harvest::storage::SqliteStorage;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting crawl: {} seed URLs, up to {} concurrent requests",
        config.source.seeds.len(),
        config.crawler.concurrency_limit
    );

    match crawl(config, config_hash).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            println!("{}", format_run_summary(&report));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
