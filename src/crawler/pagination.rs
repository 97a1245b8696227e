//! Pagination resolver
//!
//! Page 1 of a review feed carries `<link rel="..." href="..."/>` navigation
//! elements. The one marked `last` points at the final page, whose number is
//! embedded as a `page=N` path segment of its href.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{feed_url, fetch_feed};
use crate::crawler::parser::{parse_document, Document};
use crate::HarvestError;
use reqwest::Client;

/// Finds the `last` navigation link of a feed and returns its page number
///
/// # Errors
///
/// * `HarvestError::NotFound` - the feed has no `last` link (usually an app without reviews)
/// * `HarvestError::Format` - the link carries no usable `page=N` component
pub fn last_page_from_document(doc: &Document) -> Result<u32, HarvestError> {
    let links = doc
        .get("feed")
        .and_then(|feed| feed.get("link"))
        .ok_or_else(|| HarvestError::NotFound("feed has no navigation links".to_string()))?;

    let href = links
        .as_slice()
        .iter()
        .find(|link| link.get("@rel").and_then(|rel| rel.as_text()) == Some("last"))
        .ok_or_else(|| HarvestError::NotFound("feed has no 'last' link".to_string()))?
        .get("@href")
        .and_then(|href| href.as_text())
        .ok_or_else(|| HarvestError::Format("'last' link has no href".to_string()))?;

    page_number_from_href(href)
}

/// Extracts the page number from a feed link
///
/// The first `/`-separated segment holding `page=N` wins. Relative links are
/// accepted and the query string is ignored.
///
/// # Example
///
/// ```
/// use review_harvest::crawler::page_number_from_href;
///
/// let href = "https://itunes.apple.com/kr/rss/customerreviews/page=10/id=1/sortby=mostrecent/xml?urlDesc=/customerreviews/page=1";
/// assert_eq!(page_number_from_href(href).unwrap(), 10);
/// ```
pub fn page_number_from_href(href: &str) -> Result<u32, HarvestError> {
    let path = href.split(['?', '#']).next().unwrap_or_default();

    let number = path
        .split('/')
        .find_map(|segment| segment.split_once("page=").map(|(_, number)| number))
        .ok_or_else(|| HarvestError::Format(format!("no page component in '{}'", href)))?;

    number
        .parse::<u32>()
        .map_err(|e| HarvestError::Format(format!("bad page number in '{}': {}", href, e)))
}

/// Fetches page 1 of an app's feed and resolves the last page number
///
/// Performs exactly one request.
pub async fn resolve_last_page(
    client: &Client,
    config: &CrawlerConfig,
    app_id: u64,
) -> Result<u32, HarvestError> {
    let url = feed_url(config, app_id, 1);
    let body = fetch_feed(client, &url).await?;
    let doc = parse_document(&body)?;
    last_page_from_document(&doc)
}
