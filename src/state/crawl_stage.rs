//! Crawl stage definitions for one pipeline run
//!
//! A run moves through the stages strictly forward. The only shortcut is
//! finishing straight after link extraction when no article links were found.

use std::fmt;

/// Represents the current stage of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlStage {
    /// Nothing has been requested yet
    Idle,

    /// Seed (section) pages are being fetched
    FetchingSeeds,

    /// Article links are being collected from the fetched seeds
    ExtractingLinks,

    /// Article pages are being fetched
    FetchingArticles,

    /// Article pages are being turned into records
    ExtractingRecords,

    /// The run is finished and its records have been handed off
    Done,
}

impl CrawlStage {
    /// Returns true if the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if the stage issues network requests
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::FetchingSeeds | Self::FetchingArticles)
    }

    /// Returns the stage that normally follows this one
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::FetchingSeeds),
            Self::FetchingSeeds => Some(Self::ExtractingLinks),
            Self::ExtractingLinks => Some(Self::FetchingArticles),
            Self::FetchingArticles => Some(Self::ExtractingRecords),
            Self::ExtractingRecords => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if moving from this stage to `to` is allowed
    pub fn can_transition_to(&self, to: Self) -> bool {
        // empty link set ends the run early
        if *self == Self::ExtractingLinks && to == Self::Done {
            return true;
        }
        self.next() == Some(to)
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingSeeds => "fetching_seeds",
            Self::ExtractingLinks => "extracting_links",
            Self::FetchingArticles => "fetching_articles",
            Self::ExtractingRecords => "extracting_records",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
