//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the phases of one app's crawl and the legal transitions between them

mod crawl_state;

pub use crawl_state::CrawlState;
