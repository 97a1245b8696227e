//! Configuration module for Review-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so the crawler also runs without any file.
//!
//! # Example
//!
//! ```no_run
//! use review_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Feed country: {}", config.crawler.country);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{default_apps, AppEntry, Config, CrawlerConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
