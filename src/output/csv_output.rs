//! CSV output handler
//!
//! Reviews are written as UTF-8 with a byte-order mark so spreadsheet tools
//! pick the right encoding, with the header `USER,DATE,STAR,LIKE,TITLE,REVIEW`.

use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::review::ReviewRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row of the review file
pub const HEADER: [&str; 6] = ["USER", "DATE", "STAR", "LIKE", "TITLE", "REVIEW"];

/// Source timestamp layout; the offset is always published as `-07:00`
const SOURCE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S-07:00";

/// Timestamp layout written to the DATE column
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a review date such as `2023-05-01T09:12:44-07:00`
///
/// The offset must be exactly `-07:00`; the result keeps the wall-clock time
/// without converting it.
///
/// # Errors
///
/// * `OutputError::Format` - the text does not match the layout
pub fn parse_review_date(text: &str) -> OutputResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, SOURCE_DATE_FORMAT).map_err(|e| {
        OutputError::Format(format!(
            "date '{}' does not match {}: {}",
            text, SOURCE_DATE_FORMAT, e
        ))
    })
}

#[derive(Debug, Serialize)]
struct ReviewRow<'a> {
    user: &'a str,
    date: String,
    star: u8,
    like: u64,
    title: &'a str,
    review: &'a str,
}

impl<'a> ReviewRow<'a> {
    fn from_record(record: &'a ReviewRecord) -> OutputResult<Self> {
        let date = parse_review_date(&record.date)?;
        Ok(Self {
            user: &record.user,
            date: date.format(OUTPUT_DATE_FORMAT).to_string(),
            star: record.star,
            like: record.like,
            title: &record.title,
            review: &record.review,
        })
    }
}

/// Writes reviews as a BOM-prefixed CSV file
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvOutputHandler;

impl CsvOutputHandler {
    pub fn new() -> Self {
        Self
    }
}

impl OutputHandler for CsvOutputHandler {
    fn write(&self, records: &[ReviewRecord], destination: &Path) -> OutputResult<()> {
        // Convert every row first so a bad date leaves any existing file untouched
        let rows = records
            .iter()
            .map(ReviewRow::from_record)
            .collect::<OutputResult<Vec<_>>>()?;

        let mut file = BufWriter::new(File::create(destination)?);
        file.write_all(UTF8_BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        writer.write_record(HEADER)?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(())
    }
}
