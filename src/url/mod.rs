//! URL handling module for News-Harvest
//!
//! This module provides hyperlink normalization and article URL matching.

mod matcher;
mod normalize;

pub use matcher::ArticlePattern;
pub use normalize::normalize_href;
