//! Crawler module for review feed fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of feed pages
//! - Feed markup parsing into a generic document tree
//! - Last-page resolution from navigation links
//! - Request pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod pagination;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, CrawlOutcome, Coordinator};
pub use fetcher::{build_http_client, feed_url, fetch_feed};
pub use pagination::{last_page_from_document, page_number_from_href, resolve_last_page};
pub use parser::{parse_document, Document, Value};
pub use scheduler::RateLimiter;

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl for one app
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Resolve the last review page
/// 3. Fetch, parse and extract every page
/// 4. Write the collected reviews to the configured output file
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `app_id` - Numeric App Store identifier
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl finished, with or without reviews
/// * `Err(HarvestError)` - Crawl failed
pub async fn crawl(config: &Config, app_id: u64) -> Result<CrawlOutcome, HarvestError> {
    run_crawl(config, app_id).await
}
