//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one pipeline run through its stages:
//! - Fetching every seed page under the concurrency cap
//! - Collecting article links from the seeds that answered
//! - Fetching the article pages under the same cap
//! - Turning the fetched pages into records
//!
//! Nothing is written to storage here; the caller decides what to do with
//! the [`CrawlOutcome`].

use crate::article::Article;
use crate::config::Config;
use crate::crawler::{merge_unique, ArticleExtractor, FetchFailure, Fetcher, LinkExtractor};
use crate::state::CrawlStage;
use crate::url::ArticlePattern;
use crate::NewsError;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use url::Url;

/// Counters collected during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub seeds_requested: usize,
    pub seeds_fetched: usize,
    pub links_found: usize,
    pub articles_fetched: usize,
    pub article_fetch_failures: usize,
    pub records_extracted: usize,
    pub records_rejected: usize,
}

/// Records produced by a run, in link discovery order
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub records: Vec<Article>,
    pub stats: CrawlStats,
}

impl CrawlOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    links: LinkExtractor,
    articles: ArticleExtractor,
    concurrency: usize,
    seeds: Vec<String>,
    stage: CrawlStage,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(NewsError)` - The HTTP client, pattern or selectors could not be built
    pub fn new(config: &Config) -> Result<Self, NewsError> {
        let pattern = ArticlePattern::new(&config.source.article_pattern)?;

        Ok(Self {
            fetcher: Fetcher::from_config(&config.http, &config.crawler)?,
            links: LinkExtractor::new(pattern)?,
            articles: ArticleExtractor::new()?,
            concurrency: config.crawler.concurrency_limit.max(1) as usize,
            seeds: config.source.seeds.clone(),
            stage: CrawlStage::Idle,
        })
    }

    pub fn stage(&self) -> CrawlStage {
        self.stage
    }

    /// Runs the pipeline once
    ///
    /// Individual fetch failures and rejected pages never fail the run; they
    /// only show up in [`CrawlStats`]. An empty link set ends the run early
    /// with zero records.
    pub async fn run(&mut self) -> Result<CrawlOutcome, NewsError> {
        let start_time = Instant::now();
        self.stage = CrawlStage::Idle;
        let seeds = self.seeds.clone();
        let mut stats = CrawlStats {
            seeds_requested: seeds.len(),
            ..CrawlStats::default()
        };

        self.enter(CrawlStage::FetchingSeeds)?;
        let seed_bodies = self.fetch_all(&seeds).await;
        let fetched_seeds: Vec<(&String, String)> = seeds
            .iter()
            .zip(seed_bodies)
            .filter_map(|(seed, body)| body.ok().map(|html| (seed, html)))
            .collect();
        stats.seeds_fetched = fetched_seeds.len();
        tracing::info!(
            "Fetched {} of {} seed pages",
            stats.seeds_fetched,
            stats.seeds_requested
        );

        self.enter(CrawlStage::ExtractingLinks)?;
        let mut batches = Vec::with_capacity(fetched_seeds.len());
        for (seed, html) in &fetched_seeds {
            let base = Url::parse(seed)?;
            let found = self.links.extract_links(html, &base);
            tracing::debug!("{} article links on {}", found.len(), seed);
            batches.push(found);
        }
        let links = merge_unique(batches);
        stats.links_found = links.len();
        tracing::info!("Found {} unique article links", stats.links_found);

        if links.is_empty() {
            self.enter(CrawlStage::Done)?;
            tracing::info!("No article links found, nothing to collect");
            return Ok(CrawlOutcome {
                records: Vec::new(),
                stats,
            });
        }

        self.enter(CrawlStage::FetchingArticles)?;
        let article_bodies = self.fetch_all(&links).await;

        self.enter(CrawlStage::ExtractingRecords)?;
        let mut records = Vec::new();
        for (url, body) in links.iter().zip(article_bodies) {
            let html = match body {
                Ok(html) => html,
                Err(_) => {
                    stats.article_fetch_failures += 1;
                    continue;
                }
            };
            stats.articles_fetched += 1;

            match self.articles.parse_article(&html, url) {
                Some(article) => records.push(article),
                None => stats.records_rejected += 1,
            }
        }
        stats.records_extracted = records.len();

        self.enter(CrawlStage::Done)?;
        tracing::info!(
            "Collected {} articles from {} links in {:?} ({} fetch failures, {} rejected)",
            stats.records_extracted,
            stats.links_found,
            start_time.elapsed(),
            stats.article_fetch_failures,
            stats.records_rejected
        );

        Ok(CrawlOutcome { records, stats })
    }

    /// Fetches every URL with at most `concurrency` requests in flight
    ///
    /// The results line up with `urls` position by position.
    async fn fetch_all(&self, urls: &[String]) -> Vec<Result<String, FetchFailure>> {
        stream::iter(urls)
            .map(|url| self.fetcher.fetch(url))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    fn enter(&mut self, next: CrawlStage) -> Result<(), NewsError> {
        if !self.stage.can_transition_to(next) {
            return Err(NewsError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }

        if next.is_fetching() {
            tracing::debug!(
                "Stage {} -> {} (up to {} requests in flight)",
                self.stage,
                next,
                self.concurrency
            );
        } else {
            tracing::debug!("Stage {} -> {}", self.stage, next);
        }
        self.stage = next;
        Ok(())
    }
}
