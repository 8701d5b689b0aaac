//! Line-level extraction: classification, field capture, record building.
//!
//! The three stages here are pure and synchronous; concurrency lives one layer
//! up in [`crate::batch`]. A raw line flows through
//! [`LineClassifier::classify`] → [`FieldExtractor::extract`] →
//! [`Record::from_extraction`], producing at most one record per line.

pub mod classifier;
pub mod extractor;
pub mod record;

pub use classifier::LineClassifier;
pub use extractor::{Extraction, FieldExtractor};
pub use record::Record;
