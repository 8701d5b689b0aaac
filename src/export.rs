//! CSV serialization of the final record set.
//!
//! The exporter projects records onto a fixed column list and writes them in
//! the order the selector produced; it never re-sorts. Output is
//! byte-reproducible for identical input.

use crate::error::{Result, SiftError};
use crate::extract::Record;
use std::io::Write;

/// Write `records` as CSV to `writer`: one header row naming `columns`, then
/// one row per record in the given order. A record missing a projected column
/// renders as an empty cell; quoting follows standard CSV rules (handled by
/// the `csv` writer).
pub fn write_csv<W: Write>(records: &[Record], columns: &[String], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    csv_writer.write_record(columns)?;
    for record in records {
        csv_writer.write_record(
            columns
                .iter()
                .map(|column| record.get(column).unwrap_or("")),
        )?;
    }

    csv_writer
        .flush()
        .map_err(|e| SiftError::export(format!("failed to flush CSV output: {e}")))?;
    Ok(())
}

/// Serialize `records` to an in-memory CSV byte buffer.
pub fn to_csv(records: &[Record], columns: &[String]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(records, columns, &mut buffer)?;
    Ok(buffer)
}
