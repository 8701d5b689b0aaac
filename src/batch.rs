//! Concurrent batch aggregation over many log files.
//!
//! Work is partitioned two ways: one task per input file, and within a file
//! one task per `chunk_size` lines. Chunk tasks are independent: each owns
//! its private line buffer and returns its private record list, so no shared
//! state is mutated concurrently. Results are reassembled strictly by file
//! index and chunk index after all tasks have joined, which makes the
//! aggregate record order canonical no matter which task finished first.
//!
//! Failure isolation: an unreadable file fails alone and is reported in the
//! [`BatchReport`]; sibling files keep scanning. The batch itself fails only
//! when every declared input failed. Cancellation is dropping the returned
//! future; the internal `JoinSet`s abort their remaining tasks on drop and
//! nothing has been written to shared output by that point.

use crate::error::{Result, SiftError};
use crate::extract::{FieldExtractor, Record};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

/// One declared input: a readable path plus the name to record as provenance.
///
/// The display name is kept separate from the path because callers that stage
/// uploads through temporary files want the original file name in the output,
/// not the temp path.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub path: PathBuf,
    pub display_name: String,
}

impl BatchInput {
    /// Input whose display name is the path's file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, display_name }
    }

    /// Input with an explicit display name (e.g. the upload's original name).
    pub fn with_display_name(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
        }
    }
}

/// Scan result for a single input file.
#[derive(Debug)]
pub struct FileReport {
    pub display_name: String,
    pub lines_read: u64,
    pub records: Vec<Record>,
}

/// Aggregate result for a whole batch, in canonical (file, chunk, line) order.
#[derive(Debug)]
pub struct BatchReport {
    /// All extracted records across all readable inputs.
    pub records: Vec<Record>,
    /// Total lines scanned across readable inputs.
    pub lines_read: u64,
    /// Inputs that could not be read, with the reason. Never fatal unless it
    /// is every input.
    pub failures: Vec<(String, SiftError)>,
}

impl BatchReport {
    /// Number of records extracted before deduplication.
    pub fn extracted(&self) -> usize {
        self.records.len()
    }
}

/// Scan one line stream, fanning chunks out to concurrent tasks.
///
/// Lines are read as raw bytes and decoded lossily, so a stray non-UTF-8 line
/// is still scanned instead of poisoning the file. An I/O error mid-stream is
/// a file-level failure.
pub async fn scan_reader<R>(
    mut reader: R,
    display_name: &str,
    extractor: Arc<FieldExtractor>,
    chunk_size: usize,
) -> Result<FileReport>
where
    R: AsyncBufRead + Unpin,
{
    let chunk_size = chunk_size.max(1);
    let display: Arc<str> = Arc::from(display_name);

    let mut tasks: JoinSet<(usize, Vec<Record>)> = JoinSet::new();
    let mut buffer: Vec<String> = Vec::with_capacity(chunk_size);
    let mut chunk_index = 0usize;
    let mut lines_read = 0u64;
    let mut raw: Vec<u8> = Vec::new();

    loop {
        raw.clear();
        let n = reader.read_until(b'\n', &mut raw).await?;
        if n == 0 {
            break;
        }
        lines_read += 1;

        let line = String::from_utf8_lossy(&raw);
        buffer.push(line.trim_end_matches(['\n', '\r']).to_string());

        if buffer.len() >= chunk_size {
            let lines = std::mem::replace(&mut buffer, Vec::with_capacity(chunk_size));
            spawn_chunk(&mut tasks, chunk_index, lines, &extractor, &display);
            chunk_index += 1;
        }
    }
    if !buffer.is_empty() {
        spawn_chunk(&mut tasks, chunk_index, buffer, &extractor, &display);
        chunk_index += 1;
    }

    let mut chunks: Vec<(usize, Vec<Record>)> = Vec::with_capacity(chunk_index);
    while let Some(joined) = tasks.join_next().await {
        let chunk =
            joined.map_err(|e| SiftError::other(format!("chunk task failed: {e}")))?;
        chunks.push(chunk);
    }

    // Completion order is arbitrary; reassemble in chunk order so the output
    // is identical for any chunk size and any scheduling.
    chunks.sort_unstable_by_key(|(index, _)| *index);
    let records: Vec<Record> = chunks.into_iter().flat_map(|(_, r)| r).collect();

    debug!(
        "{display_name}: {lines_read} lines, {} records, {chunk_index} chunks",
        records.len()
    );

    Ok(FileReport {
        display_name: display_name.to_string(),
        lines_read,
        records,
    })
}

fn spawn_chunk(
    tasks: &mut JoinSet<(usize, Vec<Record>)>,
    index: usize,
    lines: Vec<String>,
    extractor: &Arc<FieldExtractor>,
    display: &Arc<str>,
) {
    let extractor = Arc::clone(extractor);
    let display = Arc::clone(display);
    tasks.spawn(async move {
        let mut records = Vec::new();
        for line in &lines {
            if let Some(extraction) = extractor.extract(line) {
                records.push(Record::from_extraction(extraction, &display));
            }
        }
        (index, records)
    });
}

/// Scan one file from disk.
pub async fn scan_file(
    path: &Path,
    display_name: &str,
    extractor: Arc<FieldExtractor>,
    chunk_size: usize,
) -> Result<FileReport> {
    let file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SiftError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => SiftError::file_error(format!("Failed to open file: {}", path.display()), e),
    })?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| SiftError::file_error("Failed to read file metadata", e))?;
    if !metadata.is_file() {
        return Err(SiftError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    scan_reader(BufReader::new(file), display_name, extractor, chunk_size).await
}

/// Scan a whole batch of inputs concurrently and merge the results.
///
/// One task per input; results are merged in declared-input order after the
/// full join barrier. Per-file failures land in [`BatchReport::failures`];
/// the call errors only when every input failed.
pub async fn process_batch(
    inputs: &[BatchInput],
    extractor: Arc<FieldExtractor>,
    chunk_size: usize,
) -> Result<BatchReport> {
    let mut tasks: JoinSet<(usize, String, Result<FileReport>)> = JoinSet::new();
    for (index, input) in inputs.iter().enumerate() {
        let extractor = Arc::clone(&extractor);
        let path = input.path.clone();
        let display = input.display_name.clone();
        tasks.spawn(async move {
            let outcome = scan_file(&path, &display, extractor, chunk_size).await;
            (index, display, outcome)
        });
    }

    let mut outcomes: Vec<(usize, String, Result<FileReport>)> = Vec::with_capacity(inputs.len());
    while let Some(joined) = tasks.join_next().await {
        let outcome =
            joined.map_err(|e| SiftError::other(format!("file task failed: {e}")))?;
        outcomes.push(outcome);
    }
    outcomes.sort_unstable_by_key(|(index, _, _)| *index);

    let mut report = BatchReport {
        records: Vec::new(),
        lines_read: 0,
        failures: Vec::new(),
    };
    for (_, display, outcome) in outcomes {
        match outcome {
            Ok(file) => {
                report.lines_read += file.lines_read;
                report.records.extend(file.records);
            }
            Err(err) => {
                warn!("skipping {display}: {err}");
                report.failures.push((display, err));
            }
        }
    }

    if !inputs.is_empty() && report.failures.len() == inputs.len() {
        return Err(SiftError::batch("every input file was unreadable"));
    }

    Ok(report)
}
