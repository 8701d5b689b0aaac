//! Relevance test for raw log lines.

use crate::error::Result;
use regex::{Regex, RegexSet};

/// Decides whether a raw log line is worth extracting.
///
/// A line is relevant iff at least one target marker matches it, and, when a
/// secondary filter is configured, the secondary filter matches it too.
/// Stateless and deterministic: the answer depends only on the line and the
/// patterns compiled at construction.
#[derive(Debug)]
pub struct LineClassifier {
    markers: RegexSet,
    secondary: Option<Regex>,
}

impl LineClassifier {
    /// Compile a classifier from marker pattern sources and an optional
    /// secondary filter pattern.
    pub fn new(markers: &[String], secondary: Option<&str>) -> Result<Self> {
        let markers = RegexSet::new(markers)?;
        let secondary = secondary.map(Regex::new).transpose()?;
        Ok(Self { markers, secondary })
    }

    /// Returns true iff the line belongs to a configured event category.
    ///
    /// One `RegexSet` scan for the markers plus at most one scan for the
    /// secondary filter; no tokenization of the line.
    pub fn classify(&self, line: &str) -> bool {
        if !self.markers.is_match(line) {
            return false;
        }
        match &self.secondary {
            Some(filter) => filter.is_match(line),
            None => true,
        }
    }
}
