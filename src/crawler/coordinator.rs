//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one app's crawl through its phases:
//! - Resolving the last page from page 1's navigation links
//! - Walking pages 1..=last with a pause after every request
//! - Skipping pages that fail to download or parse
//! - Handing the collected reviews to the output handler

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, feed_url, fetch_feed};
use crate::crawler::pagination::resolve_last_page;
use crate::crawler::parser::{parse_document, Document};
use crate::crawler::scheduler::RateLimiter;
use crate::output::{CsvOutputHandler, OutputHandler};
use crate::review::{extract_reviews, CrawlResult};
use crate::state::CrawlState;
use crate::HarvestError;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// How a crawl ended
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The feed had no pagination metadata; no file was written
    NoReviews { reason: String },

    /// Reviews were written to `path`
    Written { path: PathBuf, result: CrawlResult },
}

impl CrawlOutcome {
    /// The collected reviews, if the crawl got as far as writing them
    pub fn result(&self) -> Option<&CrawlResult> {
        match self {
            CrawlOutcome::Written { result, .. } => Some(result),
            CrawlOutcome::NoReviews { .. } => None,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlerConfig,
    client: Client,
    limiter: RateLimiter,
    output: Box<dyn OutputHandler + Send + Sync>,
    state: CrawlState,
}

impl Coordinator {
    /// Creates a new coordinator writing CSV output
    ///
    /// # Arguments
    ///
    /// * `config` - Feed location and request pacing
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: CrawlerConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(&config)?;
        let limiter = RateLimiter::from_millis(config.request_delay_ms);

        Ok(Self {
            config,
            client,
            limiter,
            output: Box::new(CsvOutputHandler::new()),
            state: CrawlState::Start,
        })
    }

    /// Replaces the output handler
    pub fn with_output_handler(mut self, output: Box<dyn OutputHandler + Send + Sync>) -> Self {
        self.output = output;
        self
    }

    /// Phase of the current (or last) crawl
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Number of feed requests sent so far
    pub fn request_count(&self) -> u64 {
        self.limiter.request_count()
    }

    fn transition(&mut self, to: CrawlState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(to) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!("Crawl state {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }

    /// Crawls every review page of an app and writes them to `destination`
    ///
    /// Any failure while resolving the last page ends the crawl with
    /// `CrawlOutcome::NoReviews` and no file. Pages that fail to download or
    /// parse are skipped. A date that does not match the feed's timestamp
    /// layout fails the whole crawl at write time.
    pub async fn crawl(
        &mut self,
        app_id: u64,
        destination: &Path,
    ) -> Result<CrawlOutcome, HarvestError> {
        self.state = CrawlState::Start;
        self.transition(CrawlState::ResolvingLastPage)?;

        let first_url = feed_url(&self.config, app_id, 1);
        let resolved = resolve_last_page(&self.client, &self.config, app_id).await;
        self.limiter.record_request();

        let last_page = match resolved {
            Ok(last_page) => last_page,
            Err(e) => {
                tracing::info!("{}", first_url);
                tracing::info!("No reviews: app id {}", app_id);
                tracing::info!("Reason: {}", e);
                self.transition(CrawlState::NoReviews)?;
                return Ok(CrawlOutcome::NoReviews {
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!("App {} has {} review page(s)", app_id, last_page);
        self.transition(CrawlState::Paging)?;
        let result = self.collect_pages(app_id, last_page).await;

        self.transition(CrawlState::Writing)?;
        self.output.write(&result.records, destination)?;
        self.transition(CrawlState::Done)?;

        tracing::info!(
            "Saved {} reviews to file: {}",
            result.len(),
            destination.display()
        );

        Ok(CrawlOutcome::Written {
            path: destination.to_path_buf(),
            result,
        })
    }

    /// Walks pages 1..=last_page and accumulates their reviews
    async fn collect_pages(&mut self, app_id: u64, last_page: u32) -> CrawlResult {
        let mut result = CrawlResult::new(app_id);

        for page in 1..=last_page {
            let url = feed_url(&self.config, app_id, page);
            tracing::info!("{}", url);

            let doc = match self.fetch_page(&url).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("Skip {}: {}", url, e);
                    result.skipped_pages.push(page);
                    continue;
                }
            };

            let extraction = extract_reviews(&doc);
            tracing::debug!(
                "Page {}: {} reviews, {} skipped entries",
                page,
                extraction.records.len(),
                extraction.skipped.len()
            );
            result.extend_from_page(extraction);
        }

        result
    }

    /// Fetches one page, pauses, then parses it
    ///
    /// The pause follows every request, successful or not.
    async fn fetch_page(&mut self, url: &str) -> Result<Document, HarvestError> {
        self.limiter.wait().await;
        let fetched = fetch_feed(&self.client, url).await;
        self.limiter.pause_after_request().await;

        let body = fetched?;
        Ok(parse_document(&body)?)
    }
}

/// Runs a crawl for one app using the configured output location
///
/// # Example
///
/// ```no_run
/// use review_harvest::config::Config;
/// use review_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// run_crawl(&config, 1503464984).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, app_id: u64) -> Result<CrawlOutcome, HarvestError> {
    let destination = config.output_path(app_id);
    let mut coordinator = Coordinator::new(config.crawler.clone())?;
    coordinator.crawl(app_id, &destination).await
}
