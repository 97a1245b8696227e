//! Review-Harvest: an App Store customer review collector
//!
//! This crate walks the paginated customer-review RSS feed of an application,
//! normalizes every review entry into a flat record and writes the collected
//! reviews to a single CSV file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod prompt;
pub mod review;
pub mod state;

use thiserror::Error;

/// Main error type for Review-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Feed parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown application: {0}")]
    UnknownApp(String),
}

/// Malformed feed markup
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML error at byte {position}: {message}")]
    Xml { position: usize, message: String },

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("Document has no root element")]
    Empty,
}

/// Errors raised while mapping a single feed entry into a review record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is not an integer: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Result type alias for Review-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, Coordinator};
pub use review::{CrawlResult, ReviewRecord};
pub use state::CrawlState;
