//! # radsift - ClearPass RADIUS Log Extractor
//!
//! A batch extract-transform-export tool for RADIUS/AAA server log text.
//! radsift scans line-oriented log files concurrently, extracts one structured
//! record per relevant line using a field-tagged `key=value` grammar,
//! deduplicates by subject identity keeping the most recent record, and
//! exports the result as CSV with a fixed column projection.
//!
//! ## Pipeline
//!
//! ```text
//! raw lines -> classify -> extract -> build record   (per line, in parallel chunks)
//!                                        |
//!                          join barrier, canonical merge
//!                                        |
//!                      sort desc -> dedup by identity -> include filter -> CSV
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - Pattern-set and pipeline configuration, TOML profiles
//! - [`extract`] - Line classification, field capture, record building
//! - [`batch`] - Concurrent chunked aggregation over many files
//! - [`select`] - Deduplication and final inclusion filtering
//! - [`export`] - CSV projection and serialization

// Core modules
pub mod config;
pub mod error;
pub mod extract;

// Pipeline stages
pub mod batch;
pub mod export;
pub mod select;

// Re-export commonly used types for convenience
pub use error::{Result, SiftError};

// Public API surface for external usage
pub use batch::{process_batch, BatchInput, BatchReport};
pub use config::{ExtractConfig, IncludeFilter};
pub use export::{to_csv, write_csv};
pub use extract::{FieldExtractor, Record};
pub use select::select;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
