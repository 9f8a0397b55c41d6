use crate::ConfigError;
use regex::Regex;

/// Matcher for the article URL shape
///
/// A candidate matches only when the pattern matches starting at its first
/// character, whether or not the pattern itself begins with `^`.
#[derive(Debug, Clone)]
pub struct ArticlePattern {
    regex: Regex,
}

impl ArticlePattern {
    /// Compiles an article pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use news_harvest::url::ArticlePattern;
    ///
    /// let pattern = ArticlePattern::new(r"https?://n\.news\.naver\.com/article/\d+/\d+").unwrap();
    /// assert!(pattern.matches("https://n.news.naver.com/article/001/0014123456"));
    /// assert!(!pattern.matches("see https://n.news.naver.com/article/001/0014123456"));
    /// ```
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
        Ok(Self { regex })
    }

    /// Returns true if the candidate URL has the article shape
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex
            .find(candidate)
            .map_or(false, |found| found.start() == 0)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
