//! Extraction pipeline configuration.
//!
//! An [`ExtractConfig`] is an explicit, immutable value describing the whole
//! pipeline: which lines are relevant, how timestamps and `key=value` fields
//! are recognized, how work is chunked, and how the final table is
//! deduplicated and projected. There is no process-wide pattern state; every
//! component receives its patterns at construction time.
//!
//! The built-in default is the ClearPass accounting/authentication profile the
//! tool was written for. Alternative profiles can be loaded from TOML files.

use crate::error::{Result, SiftError};
use serde::Deserialize;
use std::path::Path;

/// Reserved record key for the extracted line timestamp.
pub const TIMESTAMP_KEY: &str = "RADIUS.Timestamp";

/// Reserved record key for the source file's base name.
pub const FILENAME_KEY: &str = "RADIUS.Filename";

/// Default number of lines handed to one concurrent unit of work.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Default timestamp grammar: `YYYY-MM-DD HH:MM:SS` with optional
/// fractional seconds/milliseconds after `.` or `,`.
pub const DEFAULT_TIMESTAMP_PATTERN: &str =
    r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(?:[.,]\d+)?)";

/// Default `key=value` grammar: dotted identifier key, value running to the
/// next comma, whitespace or bracket character.
pub const DEFAULT_FIELD_PATTERN: &str = r"([A-Za-z][\w.-]*)=([^,\s\[\]]+)";

fn default_target_markers() -> Vec<String> {
    [
        "Radius Accounting",
        "Logged users",
        "User Authenticated",
        "Login-User",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn default_timestamp_pattern() -> String {
    DEFAULT_TIMESTAMP_PATTERN.to_string()
}

fn default_field_pattern() -> String {
    DEFAULT_FIELD_PATTERN.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_identity_key() -> String {
    "RADIUS.Acct-Username".to_string()
}

fn default_sort_keys() -> Vec<String> {
    vec![TIMESTAMP_KEY.to_string(), default_identity_key()]
}

fn default_export_columns() -> Vec<String> {
    [
        TIMESTAMP_KEY,
        FILENAME_KEY,
        "RADIUS.Acct-Username",
        "RADIUS.Acct-Calling-Station-Id",
        "RADIUS.Acct-Framed-IP-Address",
        "RADIUS.Acct-NAS-IP-Address",
        "RADIUS.Acct-Service-Name",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

/// Post-deduplication inclusion filter: keep only records whose `column`
/// value contains `contains` as a substring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncludeFilter {
    pub column: String,
    pub contains: String,
}

/// Complete configuration for one extraction run.
///
/// All regular expressions are stored as source text so the config stays a
/// plain data value (serde-loadable, cloneable, comparable); they are compiled
/// once when the extractor is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Regexes marking a line as belonging to an event category of interest.
    /// A line matching none of them produces no record.
    #[serde(default = "default_target_markers")]
    pub target_markers: Vec<String>,

    /// Optional additional constraint (e.g. an IP-range substring) that a
    /// line must also satisfy before extraction.
    #[serde(default)]
    pub secondary_filter: Option<String>,

    /// Regex whose first capture group is the line timestamp.
    #[serde(default = "default_timestamp_pattern")]
    pub timestamp_pattern: String,

    /// Regex whose capture groups 1 and 2 are a field key and value.
    #[serde(default = "default_field_pattern")]
    pub field_pattern: String,

    /// Lines per concurrent unit of work.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Column used to group duplicate records; one record survives per value.
    #[serde(default = "default_identity_key")]
    pub identity_key: String,

    /// Columns the selector sorts by, in order, all descending.
    #[serde(default = "default_sort_keys")]
    pub sort_keys: Vec<String>,

    /// Fixed column projection for the exported table.
    #[serde(default = "default_export_columns")]
    pub export_columns: Vec<String>,

    /// Optional final inclusion filter applied after deduplication.
    #[serde(default)]
    pub include_filter: Option<IncludeFilter>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::clearpass()
    }
}

impl ExtractConfig {
    /// The built-in ClearPass accounting/authentication profile.
    pub fn clearpass() -> Self {
        Self {
            target_markers: default_target_markers(),
            secondary_filter: None,
            timestamp_pattern: default_timestamp_pattern(),
            field_pattern: default_field_pattern(),
            chunk_size: default_chunk_size(),
            identity_key: default_identity_key(),
            sort_keys: default_sort_keys(),
            export_columns: default_export_columns(),
            include_filter: None,
        }
    }

    /// Parse a profile from TOML text. Omitted fields fall back to the
    /// ClearPass defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a profile from a TOML file.
    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SiftError::file_error(format!("Failed to read config: {}", path.display()), e)
        })?;
        Self::from_toml_str(&text)
    }

    /// Check structural invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.target_markers.is_empty() {
            return Err(SiftError::config("target_markers must not be empty"));
        }
        if self.chunk_size == 0 {
            return Err(SiftError::config("chunk_size must be at least 1"));
        }
        if self.identity_key.is_empty() {
            return Err(SiftError::config("identity_key must not be empty"));
        }
        if self.export_columns.is_empty() {
            return Err(SiftError::config("export_columns must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearpass_profile_is_valid() {
        let config = ExtractConfig::clearpass();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.identity_key, "RADIUS.Acct-Username");
        assert_eq!(config.export_columns.len(), 7);
        assert!(config.include_filter.is_none());
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let toml = r#"
            target_markers = ["Login-User"]
            chunk_size = 10

            [include_filter]
            column = "RADIUS.Acct-NAS-IP-Address"
            contains = "10.65"
        "#;
        let config = ExtractConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.target_markers, vec!["Login-User"]);
        assert_eq!(config.chunk_size, 10);
        // untouched fields keep the ClearPass defaults
        assert_eq!(config.timestamp_pattern, DEFAULT_TIMESTAMP_PATTERN);
        let filter = config.include_filter.unwrap();
        assert_eq!(filter.column, "RADIUS.Acct-NAS-IP-Address");
        assert_eq!(filter.contains, "10.65");
    }

    #[test]
    fn empty_markers_rejected() {
        let result = ExtractConfig::from_toml_str("target_markers = []");
        assert!(matches!(result, Err(SiftError::ConfigError { .. })));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let result = ExtractConfig::from_toml_str("chunk_size = 0");
        assert!(matches!(result, Err(SiftError::ConfigError { .. })));
    }

    #[test]
    fn unknown_field_rejected() {
        let result = ExtractConfig::from_toml_str("no_such_option = true");
        assert!(matches!(result, Err(SiftError::ConfigError { .. })));
    }
}
