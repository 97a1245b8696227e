//! Output handler traits and types
//!
//! This module defines the trait interface for persisting collected reviews
//! and the errors an output handler may raise.

use crate::review::ReviewRecord;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// An output handler receives the complete record set of one crawl exactly
/// once and writes it to `destination`, replacing anything already there.
pub trait OutputHandler {
    /// Writes all records in arrival order
    ///
    /// # Arguments
    ///
    /// * `records` - The reviews collected by the crawl
    /// * `destination` - File the output is written to
    fn write(&self, records: &[ReviewRecord], destination: &Path) -> OutputResult<()>;
}
