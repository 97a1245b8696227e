/// Crawl state definitions for tracking a single app's crawl
///
/// This module defines the phases a crawl passes through and which
/// transitions between them are legal.
use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Crawl created, nothing fetched yet
    Start,

    /// Fetching page 1 to find the last page number
    ResolvingLastPage,

    /// Walking pages 1..=last
    Paging,

    /// Writing the collected reviews to disk
    Writing,

    // ===== Terminal States =====
    /// The feed carried no pagination metadata; nothing is written
    NoReviews,

    /// Reviews were written successfully
    Done,
}

impl CrawlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NoReviews | Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::ResolvingLastPage)
                | (Self::ResolvingLastPage, Self::NoReviews)
                | (Self::ResolvingLastPage, Self::Paging)
                | (Self::Paging, Self::Writing)
                | (Self::Writing, Self::Done)
        )
    }

    /// Short lowercase label used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ResolvingLastPage => "resolving_last_page",
            Self::Paging => "paging",
            Self::Writing => "writing",
            Self::NoReviews => "no_reviews",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
