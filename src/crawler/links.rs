//! Article link extraction
//!
//! This module scans section pages for hyperlinks and keeps only the ones
//! that point at article pages, in the order they first appear.

use crate::crawler::compile_selector;
use crate::url::{normalize_href, ArticlePattern};
use crate::NewsError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Finds article links on seed pages
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    pattern: ArticlePattern,
    anchor_selector: Selector,
}

impl LinkExtractor {
    pub fn new(pattern: ArticlePattern) -> Result<Self, NewsError> {
        Ok(Self {
            pattern,
            anchor_selector: compile_selector("a[href]")?,
        })
    }

    pub fn pattern(&self) -> &ArticlePattern {
        &self.pattern
    }

    /// Extracts article links from an HTML page
    ///
    /// # Link Extraction Rules
    ///
    /// - Every `<a href="...">` in the document is considered
    /// - Targets are normalized with [`normalize_href`]
    /// - Only targets matching the article pattern are kept
    /// - Repeats are dropped; the first occurrence keeps its position
    ///
    /// # Arguments
    ///
    /// * `html` - The HTML content to scan
    /// * `base_url` - The URL the page was fetched from
    ///
    /// # Example
    ///
    /// ```
    /// use news_harvest::crawler::LinkExtractor;
    /// use news_harvest::url::ArticlePattern;
    /// use url::Url;
    ///
    /// let pattern = ArticlePattern::new(r"^https?://n\.news\.naver\.com/article/\d+/\d+").unwrap();
    /// let extractor = LinkExtractor::new(pattern).unwrap();
    /// let html = r#"<a href="//n.news.naver.com/article/001/1">One</a><a href="/about">About</a>"#;
    /// let base = Url::parse("https://news.naver.com/").unwrap();
    /// assert_eq!(
    ///     extractor.extract_links(html, &base),
    ///     vec!["https://n.news.naver.com/article/001/1".to_string()]
    /// );
    /// ```
    pub fn extract_links(&self, html: &str, base_url: &Url) -> Vec<String> {
        let document = Html::parse_document(html);

        let candidates = document
            .select(&self.anchor_selector)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| normalize_href(href, base_url))
            .filter(|href| self.pattern.matches(href));

        dedup_first_seen(candidates)
    }
}

/// Merges several ordered link lists into one, keeping first-seen order
///
/// A link that appears on more than one seed page is kept only at the
/// position where it was first seen.
pub fn merge_unique<I>(batches: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    dedup_first_seen(batches.into_iter().flatten())
}

fn dedup_first_seen<I>(links: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}
