//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with the portal's expected headers
//! - GET requests with a per-request timeout
//! - Linear-backoff retries for timeouts, server errors and dropped connections
//! - Failure classification

use crate::config::{CrawlerConfig, HttpConfig};
use crate::NewsError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a URL produced no body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The request exceeded its total timeout
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Connection, TLS, redirect or body decoding problem
    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchFailure {
    /// Returns true if another attempt may succeed
    ///
    /// Timeouts, 5xx responses and connection-level errors are retried;
    /// any other status is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::HttpStatus(code) => (500..600).contains(code),
        }
    }
}

/// How many times to try a URL and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Multiplied by the attempt number to get the pause after that attempt
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.fetch_retries.max(1),
            base_delay: config.retry_base_delay(),
        }
    }

    /// Pause after the given (1-based) failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Builds an HTTP client with proper configuration
///
/// The user agent, accept, accept-language and referer headers are installed
/// as default headers, so every request looks like an ordinary browser visit.
///
/// # Arguments
///
/// * `http` - Header values
/// * `crawler` - Timeout settings
///
/// # Example
///
/// ```no_run
/// use news_harvest::config::{CrawlerConfig, HttpConfig};
/// use news_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(http: &HttpConfig, crawler: &CrawlerConfig) -> Result<Client, NewsError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("accept", &http.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept-language", &http.accept_language)?,
    );
    if !http.referer.is_empty() {
        headers.insert(REFERER, header_value("referer", &http.referer)?);
    }

    let client = Client::builder()
        .user_agent(http.user_agent.as_str())
        .default_headers(headers)
        .timeout(crawler.request_timeout())
        .pool_max_idle_per_host(crawler.concurrency_limit as usize)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, NewsError> {
    HeaderValue::from_str(value).map_err(|e| NewsError::InvalidHeader {
        name,
        message: e.to_string(),
    })
}

/// Page fetcher shared by every request of one run
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(http: &HttpConfig, crawler: &CrawlerConfig) -> Result<Self, NewsError> {
        let client = build_http_client(http, crawler)?;
        Ok(Self::new(client, RetryPolicy::from_config(crawler)))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches a URL with retry logic
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return body |
    /// | Timeout | Retry up to `max_attempts` |
    /// | HTTP 5xx | Retry up to `max_attempts` |
    /// | Transport error | Retry up to `max_attempts` |
    /// | HTTP 4xx / other status | Fail immediately |
    ///
    /// Between attempts the fetcher sleeps `base_delay * attempt`; there is no
    /// pause after the last attempt. Failures are logged here and returned to
    /// the caller, which treats them as "this URL produced nothing".
    pub async fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let failure = match self.fetch_once(url).await {
                Ok(body) => {
                    tracing::trace!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                Err(failure) => failure,
            };

            if !failure.is_retryable() || attempt >= max_attempts {
                tracing::warn!(
                    url,
                    attempt,
                    max_attempts,
                    "Fetch failed: {}",
                    failure
                );
                return Err(failure);
            }

            let delay = self.policy.delay_for(attempt);
            tracing::info!(
                url,
                attempt,
                max_attempts,
                "Fetch failed ({}), retrying in {:?}",
                failure,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Performs a single GET request
    async fn fetch_once(&self, url: &str) -> Result<String, FetchFailure> {
        let response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(classify_error)
    }
}

/// Maps a reqwest error onto a fetch failure
fn classify_error(error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if let Some(status) = error.status() {
        FetchFailure::HttpStatus(status.as_u16())
    } else {
        FetchFailure::Transport(error.to_string())
    }
}
