//! radsift - ClearPass RADIUS Log Extractor
//!
//! Scans RADIUS/AAA server log files for accounting and authentication events
//! and exports the deduplicated records as CSV.

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use radsift::{process_batch, select, write_csv, BatchInput, ExtractConfig, FieldExtractor};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    // Parse command-line arguments
    let matches = Command::new("radsift")
        .version(radsift::VERSION)
        .about("Batch extractor for ClearPass RADIUS accounting/authentication logs")
        .long_about(
            "radsift scans RADIUS/AAA server log files for accounting and authentication \
             events, extracts key=value fields into structured records, keeps the most \
             recent record per user, and writes the result as CSV.",
        )
        .arg(
            Arg::new("files")
                .help("Log files to scan")
                .required(true)
                .num_args(1..)
                .value_name("FILE"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("TOML")
                .help("Pattern profile overriding the built-in ClearPass profile"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Write the CSV to this path instead of stdout"),
        )
        .arg(
            Arg::new("marker")
                .long("marker")
                .value_name("REGEX")
                .action(ArgAction::Append)
                .help("Replace the target line markers (repeatable)"),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Lines per concurrent unit of work"),
        )
        .arg(
            Arg::new("identity-key")
                .long("identity-key")
                .value_name("COLUMN")
                .help("Column used to deduplicate records"),
        )
        .arg(
            Arg::new("no-dedup")
                .long("no-dedup")
                .action(ArgAction::SetTrue)
                .help("Export every extracted record without deduplication"),
        )
        .get_matches();

    // Assemble the configuration: profile file first, flags override
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ExtractConfig::from_toml_path(Path::new(path))?,
        None => ExtractConfig::clearpass(),
    };
    if let Some(markers) = matches.get_many::<String>("marker") {
        config.target_markers = markers.cloned().collect();
    }
    if let Some(&chunk_size) = matches.get_one::<usize>("chunk-size") {
        config.chunk_size = chunk_size;
    }
    if let Some(identity_key) = matches.get_one::<String>("identity-key") {
        config.identity_key = identity_key.clone();
    }

    let inputs: Vec<BatchInput> = matches
        .get_many::<String>("files")
        .expect("files argument is required")
        .map(|file| BatchInput::from_path(PathBuf::from(file)))
        .collect();

    // Unreadable inputs fail per file inside the batch; only a batch where
    // every input failed comes back as an error here.
    let extractor = Arc::new(FieldExtractor::from_config(&config)?);
    let report = process_batch(&inputs, extractor, config.chunk_size).await?;
    info!(
        "scanned {} lines across {} inputs: {} records extracted, {} inputs failed",
        report.lines_read,
        inputs.len(),
        report.extracted(),
        report.failures.len()
    );

    let extracted = report.extracted();
    let records = if matches.get_flag("no-dedup") {
        report.records
    } else {
        select(
            report.records,
            &config.identity_key,
            &config.sort_keys,
            config.include_filter.as_ref(),
        )
    };
    info!("{} of {} records selected for export", records.len(), extracted);

    match matches.get_one::<String>("output") {
        Some(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| anyhow::anyhow!("Failed to create {path}: {e}"))?;
            write_csv(&records, &config.export_columns, file)?;
            eprintln!(
                "{} records extracted, {} exported to {path}",
                extracted,
                records.len()
            );
        }
        None => {
            let stdout = std::io::stdout();
            write_csv(&records, &config.export_columns, stdout.lock())?;
        }
    }

    Ok(())
}
