//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlStage`: the linear stage machine a single pipeline run moves through

mod crawl_stage;

pub use crawl_stage::CrawlStage;
