//! Review extraction from a parsed feed page

use crate::crawler::{Document, Value};
use crate::review::ReviewRecord;
use crate::ExtractError;

/// The entry collection of a feed page
///
/// The feed drops the sequence wrapper when a page holds exactly one entry.
/// `EntrySet` names the three shapes and `entries` flattens them, so nothing
/// past this point distinguishes a single entry from many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySet<'a> {
    Absent,
    Single(&'a Value),
    Many(&'a [Value]),
}

impl<'a> EntrySet<'a> {
    /// Reads the `feed.entry` collection of a document
    pub fn from_document(doc: &'a Document) -> Self {
        match doc.get("feed").and_then(|feed| feed.get("entry")) {
            None => EntrySet::Absent,
            Some(Value::List(items)) => EntrySet::Many(items),
            Some(single) => EntrySet::Single(single),
        }
    }

    /// Canonical view: zero, one or many entries
    pub fn entries(&self) -> &'a [Value] {
        match *self {
            EntrySet::Absent => &[],
            EntrySet::Single(entry) => std::slice::from_ref(entry),
            EntrySet::Many(items) => items,
        }
    }
}

/// An entry that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySkip {
    /// Position of the entry on its page
    pub index: usize,
    pub reason: ExtractError,
}

/// Records extracted from one page, plus the entries that were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    pub records: Vec<ReviewRecord>,
    pub skipped: Vec<EntrySkip>,
}

/// Extracts review records from a parsed feed page
///
/// A page without entries yields an empty result. Each entry is mapped on its
/// own; an entry with a missing or malformed field is logged and reported in
/// `skipped` while the rest of the page is kept.
pub fn extract_reviews(doc: &Document) -> PageExtraction {
    let entries = EntrySet::from_document(doc).entries();
    if entries.is_empty() {
        tracing::info!("No entries on page");
    }

    let mut page = PageExtraction::default();
    for (index, entry) in entries.iter().enumerate() {
        match extract_entry(entry) {
            Ok(record) => page.records.push(record),
            Err(reason) => {
                tracing::warn!("Skipping entry {}: {}", index, reason);
                page.skipped.push(EntrySkip { index, reason });
            }
        }
    }
    page
}

/// Maps one feed entry to a review record
pub fn extract_entry(entry: &Value) -> Result<ReviewRecord, ExtractError> {
    let user = text_at(entry, &["author", "name"], "author.name")?;
    let date = text_at(entry, &["updated"], "updated")?;
    let star = number_at(entry, "im:rating")?;
    let like = number_at(entry, "im:voteSum")?;
    let title = text_at(entry, &["title"], "title")?;
    let review = entry
        .get("content")
        .and_then(|content| content.as_slice().first())
        .and_then(Value::as_text)
        .ok_or(ExtractError::MissingField("content"))?
        .to_string();

    Ok(ReviewRecord {
        user,
        date,
        star,
        like,
        title,
        review,
    })
}

fn text_at(entry: &Value, keys: &[&str], field: &'static str) -> Result<String, ExtractError> {
    entry
        .path(keys)
        .and_then(Value::as_text)
        .map(str::to_string)
        .ok_or(ExtractError::MissingField(field))
}

fn number_at<T: std::str::FromStr>(entry: &Value, field: &'static str) -> Result<T, ExtractError> {
    let text = entry
        .get(field)
        .and_then(Value::as_text)
        .ok_or(ExtractError::MissingField(field))?;

    text.trim()
        .parse::<T>()
        .map_err(|_| ExtractError::InvalidNumber {
            field,
            value: text.to_string(),
        })
}
