use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Review-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_apps", rename = "app")]
    pub apps: Vec<AppEntry>,
}

/// Upstream feed and request pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Scheme and host of the review feed service
    #[serde(rename = "feed-base-url", default = "default_feed_base_url")]
    pub feed_base_url: String,

    /// Storefront country code used in the feed path
    #[serde(default = "default_country")]
    pub country: String,

    /// Pause after every feed request (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV files are written to
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// File name prefix, followed by the app id and `.csv`
    #[serde(rename = "file-prefix", default = "default_file_prefix")]
    pub file_prefix: String,
}

/// A named application in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppEntry {
    pub name: String,

    /// Numeric App Store identifier
    pub id: u64,

    /// Store page shown to the user after the crawl
    pub url: String,
}

impl Config {
    /// Looks up a catalog entry by name (case-insensitive)
    pub fn find_app(&self, name: &str) -> Option<&AppEntry> {
        self.apps
            .iter()
            .find(|app| app.name.eq_ignore_ascii_case(name))
    }

    /// Path of the CSV file for an app id
    pub fn output_path(&self, app_id: u64) -> PathBuf {
        self.output
            .directory
            .join(format!("{}{}.csv", self.output.file_prefix, app_id))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
            apps: default_apps(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            feed_base_url: default_feed_base_url(),
            country: default_country(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_feed_base_url() -> String {
    "https://itunes.apple.com".to_string()
}

fn default_country() -> String {
    "kr".to_string()
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("review-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_prefix() -> String {
    "appstore_".to_string()
}

/// Built-in catalog used when no configuration file lists any apps
pub fn default_apps() -> Vec<AppEntry> {
    vec![
        AppEntry {
            name: "burnfit".to_string(),
            id: 1503464984,
            url: "https://apps.apple.com/kr/app/%EB%B2%88%ED%95%8F-%EC%9A%B4%EB%8F%99-%EC%9D%BC%EC%A7%80-%EB%81%9D%ED%8C%90%EC%99%95/id1503464984".to_string(),
        },
        AppEntry {
            name: "fleek".to_string(),
            id: 1576993198,
            url: "https://apps.apple.com/kr/app/%ED%94%8C%EB%A6%AD-%EC%9A%B4%EB%8F%99%EC%9D%BC%EC%A7%80-%EC%9A%B4%EB%8F%99%EA%B8%B0%EB%A1%9D-%EC%9A%B4%EB%8F%99%EC%9D%BC%EA%B8%B0-%EC%9A%B4%EB%8F%99%EB%A3%A8%ED%8B%B4/id1576993198".to_string(),
        },
        AppEntry {
            name: "planfit".to_string(),
            id: 1511876936,
            url: "https://apps.apple.com/kr/app/%ED%94%8C%EB%9E%9C%ED%95%8F-%ED%97%AC%EC%8A%A4-%ED%99%88%ED%8A%B8-%EC%9A%B4%EB%8F%99-%EB%A3%A8%ED%8B%B4-%EC%B6%94%EC%B2%9C%EA%B3%BC-%ED%94%BC%ED%8A%B8%EB%8B%88%EC%8A%A4-%EA%B8%B0%EB%A1%9D/id1511876936".to_string(),
        },
        AppEntry {
            name: "fiet".to_string(),
            id: 1643675480,
            url: "https://apps.apple.com/app/id1643675480?mt=8".to_string(),
        },
    ]
}
