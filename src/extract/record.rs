//! The structured record produced for one matched log line.

use crate::config::{FILENAME_KEY, TIMESTAMP_KEY};
use crate::extract::extractor::Extraction;

/// One structured record: an ordered mapping from dotted field names to
/// string values.
///
/// Field names are unique within a record; inserting an existing key
/// overwrites its value in place (last-value-wins) without changing its
/// position. Records are built once per classified line and never merged
/// across lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build a record from extractor output plus provenance.
    ///
    /// Provenance fields go in first: `RADIUS.Filename` (the source file's
    /// base name) always, `RADIUS.Timestamp` when the line had one. The
    /// dynamically extracted fields are applied afterwards, so a dynamic key
    /// that collides with a reserved key overwrites it; the extracted value
    /// wins. A missing timestamp leaves the timestamp field absent entirely
    /// rather than empty; the record is still kept.
    pub fn from_extraction(extraction: Extraction, display_name: &str) -> Self {
        let mut record = Self::new();
        record.insert(FILENAME_KEY, basename(display_name));
        if let Some(timestamp) = extraction.timestamp {
            record.insert(TIMESTAMP_KEY, &timestamp);
        }
        for (key, value) in extraction.fields {
            record.insert(&key, &value);
        }
        record
    }

    /// Insert or overwrite a field, preserving first-insertion order.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
    }

    /// Look up a field value by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Final path component of a display name, tolerating both separators since
/// uploads may carry Windows-style paths.
fn basename(display_name: &str) -> &str {
    display_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(display_name)
}
