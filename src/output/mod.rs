//! Output module for persisting collected reviews
//!
//! This module handles:
//! - Normalizing review timestamps
//! - Writing the review table as a BOM-prefixed CSV file

mod csv_output;
mod traits;

pub use csv_output::{
    parse_review_date, CsvOutputHandler, HEADER, OUTPUT_DATE_FORMAT, UTF8_BOM,
};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::review::ReviewRecord;
use std::path::Path;

/// Writes reviews to `destination` with the default CSV handler
///
/// # Example
///
/// ```no_run
/// use review_harvest::output::write_reviews;
/// use std::path::Path;
///
/// write_reviews(&[], Path::new("appstore_1.csv")).unwrap();
/// ```
pub fn write_reviews(records: &[ReviewRecord], destination: &Path) -> OutputResult<()> {
    CsvOutputHandler::new().write(records, destination)
}
