//! Timestamp and `key=value` field capture for classified lines.

use crate::config::ExtractConfig;
use crate::error::{Result, SiftError};
use crate::extract::classifier::LineClassifier;
use regex::Regex;

/// Raw output of one extraction pass over a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Timestamp text captured by the timestamp pattern, if the line had one.
    pub timestamp: Option<String>,
    /// `key=value` pairs in match order, already deduplicated last-value-wins.
    pub fields: Vec<(String, String)>,
}

/// Extracts structured data from relevant log lines.
///
/// Holds the compiled pattern set for one run. Extraction is total over
/// classified lines: a relevant line always yields an [`Extraction`], even if
/// the timestamp is missing or no `key=value` pair matched.
#[derive(Debug)]
pub struct FieldExtractor {
    classifier: LineClassifier,
    timestamp: Regex,
    fields: Regex,
}

impl FieldExtractor {
    /// Compile an extractor from a configuration value.
    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        config.validate()?;
        let classifier =
            LineClassifier::new(&config.target_markers, config.secondary_filter.as_deref())?;
        let timestamp = Regex::new(&config.timestamp_pattern)?;
        let fields = Regex::new(&config.field_pattern)?;
        if timestamp.captures_len() < 2 {
            return Err(SiftError::pattern(
                "timestamp_pattern needs one capture group for the timestamp text",
            ));
        }
        if fields.captures_len() < 3 {
            return Err(SiftError::pattern(
                "field_pattern needs two capture groups (key, value)",
            ));
        }
        Ok(Self {
            classifier,
            timestamp,
            fields,
        })
    }

    /// Classify `line` and, when relevant, capture its timestamp and fields.
    ///
    /// Returns `None` only when the line fails classification. The timestamp
    /// pattern is applied once; the field pattern repeatedly, left to right and
    /// non-overlapping, folding duplicate keys last-value-wins. Keys and values
    /// are trimmed of surrounding whitespace.
    ///
    /// Known limitation: the value grammar terminates at the first comma,
    /// whitespace or bracket character, so values that legitimately contain an
    /// embedded comma (e.g. a human-readable role list) come out truncated at
    /// that comma. This matches the upstream log convention and is accepted
    /// lossy behavior, not something to compensate for here.
    pub fn extract(&self, line: &str) -> Option<Extraction> {
        if !self.classifier.classify(line) {
            return None;
        }

        let timestamp = self
            .timestamp
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string());

        let mut fields: Vec<(String, String)> = Vec::new();
        for caps in self.fields.captures_iter(line) {
            let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let key = key.as_str().trim();
            let value = value.as_str().trim();
            match fields.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.to_string(),
                None => fields.push((key.to_string(), value.to_string())),
            }
        }

        Some(Extraction { timestamp, fields })
    }

    /// Relevance test without field capture, for callers that only count.
    pub fn classify(&self, line: &str) -> bool {
        self.classifier.classify(line)
    }
}
