//! Integration tests for the crawler
//!
//! These tests use wiremock to serve review feed pages and run the full
//! crawl cycle end-to-end into a temporary directory.

use review_harvest::config::CrawlerConfig;
use review_harvest::crawler::{build_http_client, resolve_last_page, Coordinator, CrawlOutcome};
use review_harvest::output::{OutputError, UTF8_BOM};
use review_harvest::{CrawlState, HarvestError};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_ID: u64 = 100;

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> CrawlerConfig {
    CrawlerConfig {
        feed_base_url: base_url.to_string(),
        country: "kr".to_string(),
        request_delay_ms: 0, // No pacing needed against the mock
        timeout_secs: 5,
        user_agent: "review-harvest-test/1.0".to_string(),
    }
}

fn page_path(page: u32) -> String {
    format!(
        "/kr/rss/customerreviews/page={}/id={}/sortby=mostrecent/xml",
        page, APP_ID
    )
}

fn entry(user: &str, rating: u8) -> String {
    format!(
        r#"<entry>
    <updated>2023-05-01T09:12:44-07:00</updated>
    <id>{user}-id</id>
    <title>Review by {user}</title>
    <content type="text">{user} likes it</content>
    <link rel="related" href="https://itunes.apple.com/kr/review?id={APP_ID}&amp;type=Purple%20Software"/>
    <im:voteSum>1</im:voteSum>
    <im:contentType term="Application" label="앱"/>
    <im:voteCount>2</im:voteCount>
    <im:rating>{rating}</im:rating>
    <im:version>1.0</im:version>
    <author><name>{user}</name><uri>https://itunes.apple.com/kr/reviews/id1</uri><label></label></author>
    <content type="html">&lt;p&gt;{user} likes it&lt;/p&gt;</content>
  </entry>"#
    )
}

/// Builds a feed page; `last_page` adds the navigation links
fn feed(base_url: &str, last_page: Option<u32>, entries: &[String]) -> String {
    let links = match last_page {
        Some(last) => format!(
            r#"<link rel="alternate" type="text/html" href="https://apps.apple.com/kr/app/id{APP_ID}"/>
  <link rel="self" href="{base}/kr/rss/customerreviews/page=1/id={APP_ID}/sortby=mostrecent/xml"/>
  <link rel="first" href="{base}/kr/rss/customerreviews/page=1/id={APP_ID}/sortby=mostrecent/xml?urlDesc=/customerreviews/page=1/id={APP_ID}/sortby=mostrecent/xml"/>
  <link rel="last" href="{base}/kr/rss/customerreviews/page={last}/id={APP_ID}/sortby=mostrecent/xml?urlDesc=/customerreviews/page=1/id={APP_ID}/sortby=mostrecent/xml"/>"#,
            base = base_url
        ),
        None => format!(
            r#"<link rel="alternate" type="text/html" href="https://apps.apple.com/kr/app/id{APP_ID}"/>"#
        ),
    };

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns:im="http://itunes.apple.com/rss" xmlns="http://www.w3.org/2005/Atom" xml:lang="ko">
  <id>{base_url}/kr/rss/customerreviews/id={APP_ID}/xml</id>
  <title>iTunes Store: 고객 리뷰</title>
  <updated>2023-05-02T01:00:00-07:00</updated>
  {links}
  <author><name>iTunes Store</name><uri>http://www.apple.com/kr/itunes/</uri></author>
  {entries}
</feed>"#,
        entries = entries.concat()
    )
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path(page)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Reads a written review file back as (header, rows)
fn read_output(path: &std::path::Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let bytes = std::fs::read(path).expect("output file missing");
    assert!(bytes.starts_with(UTF8_BOM), "output must start with a BOM");
    let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
    let header = reader.headers().expect("header").clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("rows");
    (header, rows)
}

#[tokio::test]
async fn test_single_page_three_reviews() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let entries = vec![entry("kim", 5), entry("lee", 4), entry("park", 1)];
    Mock::given(method("GET"))
        .and(path(page_path(1)))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(feed(&base_url, Some(1), &entries)),
        )
        .expect(2) // once to resolve, once in the page loop
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("appstore_100.csv");

    let mut coordinator = Coordinator::new(create_test_config(&base_url)).unwrap();
    let outcome = coordinator.crawl(APP_ID, &out).await.expect("Crawl failed");

    assert!(matches!(outcome, CrawlOutcome::Written { .. }));
    assert_eq!(coordinator.state(), CrawlState::Done);
    assert_eq!(coordinator.request_count(), 2);

    let (header, rows) = read_output(&out);
    assert_eq!(
        header,
        csv::StringRecord::from(vec!["USER", "DATE", "STAR", "LIKE", "TITLE", "REVIEW"])
    );
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "kim");
    assert_eq!(&rows[0][1], "2023-05-01 09:12:44");
    assert_eq!(&rows[0][2], "5");
    assert_eq!(&rows[0][3], "1");
    assert_eq!(&rows[0][4], "Review by kim");
    assert_eq!(&rows[0][5], "kim likes it");
    assert_eq!(&rows[2][0], "park");
}

#[tokio::test]
async fn test_malformed_middle_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        1,
        feed(&base_url, Some(3), &[entry("p1a", 5), entry("p1b", 4)]),
    )
    .await;
    mount_page(&mock_server, 2, "<feed><entry><title>broken".to_string()).await;
    mount_page(&mock_server, 3, feed(&base_url, None, &[entry("p3a", 3)])).await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut coordinator = Coordinator::new(create_test_config(&base_url)).unwrap();
    let outcome = coordinator.crawl(APP_ID, &out).await.expect("Crawl failed");

    let result = outcome.result().expect("reviews written");
    assert_eq!(result.skipped_pages, vec![2]);
    let users: Vec<&str> = result.records.iter().map(|r| r.user.as_str()).collect();
    assert_eq!(users, vec!["p1a", "p1b", "p3a"]);

    let (_, rows) = read_output(&out);
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_server_error_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, 1, feed(&base_url, Some(2), &[entry("kim", 5)])).await;
    Mock::given(method("GET"))
        .and(path(page_path(2)))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut coordinator = Coordinator::new(create_test_config(&base_url)).unwrap();
    let outcome = coordinator.crawl(APP_ID, &out).await.expect("Crawl failed");

    let result = outcome.result().expect("reviews written");
    assert_eq!(result.len(), 1);
    assert_eq!(result.skipped_pages, vec![2]);
    assert!(out.exists());
}

#[tokio::test]
async fn test_timed_out_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, 1, feed(&base_url, Some(2), &[entry("kim", 5)])).await;
    Mock::given(method("GET"))
        .and(path(page_path(2)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(feed(&base_url, None, &[entry("late", 1)]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let config = CrawlerConfig {
        timeout_secs: 1,
        ..create_test_config(&base_url)
    };
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.crawl(APP_ID, &out).await.expect("Crawl failed");

    let result = outcome.result().expect("reviews written");
    assert_eq!(result.skipped_pages, vec![2]);
    assert_eq!(result.len(), 1);
    assert_eq!(result.records[0].user, "kim");

    let (_, rows) = read_output(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "kim");
}

#[tokio::test]
async fn test_empty_middle_page_adds_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, 1, feed(&base_url, Some(3), &[entry("p1a", 5)])).await;
    mount_page(&mock_server, 2, feed(&base_url, None, &[])).await;
    mount_page(
        &mock_server,
        3,
        feed(&base_url, None, &[entry("p3a", 4), entry("p3b", 2)]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut coordinator = Coordinator::new(create_test_config(&base_url)).unwrap();
    let outcome = coordinator.crawl(APP_ID, &out).await.expect("Crawl failed");

    let result = outcome.result().expect("reviews written");
    assert!(result.skipped_pages.is_empty());
    assert_eq!(result.skipped_entries, 0);
    let users: Vec<&str> = result.records.iter().map(|r| r.user.as_str()).collect();
    assert_eq!(users, vec!["p1a", "p3a", "p3b"]);

    let (_, rows) = read_output(&out);
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_zero_reviews_writes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path(page_path(1)))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed(&base_url, None, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut coordinator = Coordinator::new(create_test_config(&base_url)).unwrap();
    let outcome = coordinator.crawl(APP_ID, &out).await.expect("must not raise");

    match outcome {
        CrawlOutcome::NoReviews { reason } => assert!(reason.contains("last")),
        other => panic!("expected NoReviews, got {:?}", other),
    }
    assert_eq!(coordinator.state(), CrawlState::NoReviews);
    assert!(!out.exists());
}

#[tokio::test]
async fn test_single_entry_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, 1, feed(&base_url, Some(1), &[entry("solo", 2)])).await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut coordinator = Coordinator::new(create_test_config(&base_url)).unwrap();
    coordinator.crawl(APP_ID, &out).await.expect("Crawl failed");

    let (_, rows) = read_output(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "solo");
    assert_eq!(&rows[0][2], "2");
}

#[tokio::test]
async fn test_crawl_is_idempotent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        1,
        feed(&base_url, Some(2), &[entry("kim", 5), entry("lee", 4)]),
    )
    .await;
    mount_page(&mock_server, 2, feed(&base_url, None, &[entry("park", 3)])).await;

    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    let mut coordinator = Coordinator::new(create_test_config(&base_url)).unwrap();
    coordinator.crawl(APP_ID, &first).await.expect("first crawl");
    coordinator.crawl(APP_ID, &second).await.expect("second crawl");

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[tokio::test]
async fn test_unexpected_date_offset_fails_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let odd = entry("kim", 5).replace("-07:00</updated>", "-08:00</updated>");
    mount_page(&mock_server, 1, feed(&base_url, Some(1), &[odd])).await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.csv");

    let mut coordinator = Coordinator::new(create_test_config(&base_url)).unwrap();
    let err = coordinator.crawl(APP_ID, &out).await.unwrap_err();

    assert!(matches!(err, HarvestError::Output(OutputError::Format(_))));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_resolve_last_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path(page_path(1)))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(feed(&base_url, Some(10), &[])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let client = build_http_client(&config).unwrap();
    let last = resolve_last_page(&client, &config, APP_ID).await.unwrap();

    assert_eq!(last, 10);
}
