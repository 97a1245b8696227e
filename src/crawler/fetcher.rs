//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Building per-page feed URLs
//! - Plain GET requests returning the response body as text
//!
//! There is no retry logic here. Connection failures and non-success status
//! codes are returned to the caller, which decides whether the page is skipped.

use crate::config::CrawlerConfig;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use review_harvest::config::CrawlerConfig;
/// use review_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the customer-review feed URL for one page of an app
///
/// Pages are 1-based. The path layout is
/// `{base}/{country}/rss/customerreviews/page={page}/id={app_id}/sortby=mostrecent/xml`.
pub fn feed_url(config: &CrawlerConfig, app_id: u64, page: u32) -> String {
    format!(
        "{}/{}/rss/customerreviews/page={}/id={}/sortby=mostrecent/xml",
        config.feed_base_url.trim_end_matches('/'),
        config.country,
        page,
        app_id
    )
}

/// Fetches a feed URL and returns the body text
///
/// # Errors
///
/// * `HarvestError::Network` - connection, timeout or body read failure
/// * `HarvestError::HttpStatus` - the server answered with a non-success status
pub async fn fetch_feed(client: &Client, url: &str) -> Result<String, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| HarvestError::Network {
        url: url.to_string(),
        source,
    })
}
