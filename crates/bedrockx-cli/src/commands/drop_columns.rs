//! `bedrockx drop-columns` command implementation
//!
//! Runs column removal through the concurrent processor, so results land in
//! the output file in completion order.

use crate::error::Result;
use bedrockx_common::Record;
use bedrockx_process::concurrent::{hook_fn, BatchProcessor, ProcessorConfig};
use bedrockx_process::file::{read_file, ReadOptions};
use bedrockx_process::records::strip_columns;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Remove `columns` from every record of `input` and append the results to `output`
pub async fn run(
    input: &Path,
    output: &Path,
    columns: Vec<String>,
    workers: usize,
    show_progress: bool,
) -> Result<()> {
    let config = ProcessorConfig::builder(workers, output)
        .show_progress(show_progress)
        .build();
    let hook = hook_fn(move |record: &Record| {
        let mut out = record.clone();
        strip_columns(&mut out, &columns);
        Ok(Some(out))
    });
    // Validate before reading so a bad destination fails fast
    let processor = Arc::new(BatchProcessor::new(config, hook)?);

    let records = read_file(input, &ReadOptions::default().show_progress(show_progress))?;
    let total = records.len();
    info!(records = total, workers, "Dropping columns");

    processor.process_batch_async(records).await?;

    println!(
        "{} Processed {} record(s) into {}",
        "✓".green(),
        total,
        output.display()
    );
    Ok(())
}
