//! Review records and their extraction from feed documents
//!
//! # Components
//!
//! - `ReviewRecord`: one flattened customer review
//! - `CrawlResult`: every record collected for one app, in arrival order
//! - `EntrySet`: the feed's entry collection, which is a bare mapping when a
//!   page holds exactly one entry and a sequence otherwise
//! - `extract_reviews`: maps a parsed page to records, isolating bad entries

mod extract;

pub use extract::{extract_reviews, EntrySet, EntrySkip, PageExtraction};

/// One customer review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    /// Reviewer display name
    pub user: String,

    /// Timestamp text as published, e.g. `2023-05-01T09:12:44-07:00`
    pub date: String,

    /// Star rating, normally 1 to 5
    pub star: u8,

    /// Helpfulness vote sum
    pub like: u64,

    pub title: String,

    pub review: String,
}

/// All reviews collected for one app
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    pub app_id: u64,
    pub records: Vec<ReviewRecord>,

    /// Pages that were fetched but skipped (fetch or parse failure)
    pub skipped_pages: Vec<u32>,

    /// Entries dropped because a field was missing or malformed
    pub skipped_entries: usize,
}

impl CrawlResult {
    pub fn new(app_id: u64) -> Self {
        Self {
            app_id,
            ..Self::default()
        }
    }

    /// Appends one page's extraction output
    pub fn extend_from_page(&mut self, page: PageExtraction) {
        self.skipped_entries += page.skipped.len();
        self.records.extend(page.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
