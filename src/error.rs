//! Error types and handling infrastructure for radsift.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! ## Design Principles
//!
//! - **User-friendly messages**: Errors should provide actionable feedback
//! - **Line-level containment**: a bad line never aborts a batch; errors here
//!   describe file- or operation-level failures only
//! - **Consistency**: Standardized Result type across all modules

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for radsift operations.
///
/// This enum covers all possible error conditions that can occur while reading
/// input files, compiling pattern sets, and exporting the final table.
#[derive(Error, Debug)]
pub enum SiftError {
    /// File system related errors (file not found, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found specifically (common case for user feedback)
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// A configured regular expression failed to compile
    #[error("Invalid pattern: {message}")]
    PatternError { message: String },

    /// Configuration file or profile errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// CSV serialization errors
    #[error("Export failed: {message}")]
    ExportError { message: String },

    /// The batch as a whole could not produce a result (e.g. every input failed)
    #[error("Batch failed: {message}")]
    BatchError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for radsift operations.
///
/// This type alias provides a consistent error handling interface across
/// all modules in the radsift codebase.
pub type Result<T> = std::result::Result<T, SiftError>;

impl SiftError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a PatternError with a descriptive message
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::PatternError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an ExportError with a descriptive message
    pub fn export(message: impl Into<String>) -> Self {
        Self::ExportError {
            message: message.into(),
        }
    }

    /// Create a BatchError with a descriptive message
    pub fn batch(message: impl Into<String>) -> Self {
        Self::BatchError {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// Automatic conversion from io::Error to SiftError
impl From<std::io::Error> for SiftError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => {
                // For NotFound, we lose the specific path context here,
                // but it can be added at the call site using FileNotFound
                Self::FileError {
                    message: "File not found".to_string(),
                    source: err,
                }
            }
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}

impl From<regex::Error> for SiftError {
    fn from(err: regex::Error) -> Self {
        Self::PatternError {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for SiftError {
    fn from(err: csv::Error) -> Self {
        Self::ExportError {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SiftError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display_messages() {
        let path = PathBuf::from("/test/file.log");

        let file_not_found = SiftError::FileNotFound { path: path.clone() };
        assert_eq!(file_not_found.to_string(), "File not found: /test/file.log");

        let not_a_file = SiftError::NotAFile { path: path.clone() };
        assert_eq!(
            not_a_file.to_string(),
            "Path is not a regular file: /test/file.log"
        );

        let pattern_err = SiftError::pattern("unbalanced parenthesis");
        assert_eq!(
            pattern_err.to_string(),
            "Invalid pattern: unbalanced parenthesis"
        );
    }

    #[test]
    fn test_error_constructors() {
        let config_err = SiftError::config("missing identity_key");
        matches!(config_err, SiftError::ConfigError { .. });

        let export_err = SiftError::export("writer poisoned");
        matches!(export_err, SiftError::ExportError { .. });

        let other_err = SiftError::other("Unknown error");
        matches!(other_err, SiftError::Other { .. });
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let sift_err: SiftError = io_err.into();

        match sift_err {
            SiftError::FileError { message, .. } => {
                assert_eq!(message, "File not found");
            }
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn test_regex_error_conversion() {
        let bad = regex::Regex::new("(").unwrap_err();
        let sift_err: SiftError = bad.into();
        matches!(sift_err, SiftError::PatternError { .. });
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<String> {
            Ok("success".to_string())
        }

        let result = returns_result();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "success");
    }
}
