use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent sent to the portal
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

/// Article URL shape for Naver News (`/article/<section>/<id>`)
pub const DEFAULT_ARTICLE_PATTERN: &str = r"^https?://n\.news\.naver\.com/article/\d+/\d+";

/// Main configuration structure for News-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Where to start and which links count as articles
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Section pages scanned for article links
    pub seeds: Vec<String>,

    /// Regular expression an article URL must match from its first character
    #[serde(rename = "article-pattern", default = "default_article_pattern")]
    pub article_pattern: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of in-flight fetches
    #[serde(rename = "concurrency-limit", default = "default_concurrency_limit")]
    pub concurrency_limit: u32,

    /// Total attempts per URL, including the first one
    #[serde(rename = "fetch-retries", default = "default_fetch_retries")]
    pub fetch_retries: u32,

    /// Base of the linear backoff between attempts (milliseconds)
    #[serde(rename = "retry-base-delay-ms", default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Total time allowed for one request (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl CrawlerConfig {
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
            fetch_retries: default_fetch_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Request headers expected by the portal's bot mitigation
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(default = "default_referer")]
    pub referer: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            accept: default_accept(),
            referer: default_referer(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_article_pattern() -> String {
    DEFAULT_ARTICLE_PATTERN.to_string()
}

fn default_concurrency_limit() -> u32 {
    10
}

fn default_fetch_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    700
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string()
}

fn default_referer() -> String {
    "https://news.naver.com/".to_string()
}
