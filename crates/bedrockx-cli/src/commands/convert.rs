//! `bedrockx convert` command implementation

use crate::error::Result;
use bedrockx_process::file::{read_file, save_file, ReadOptions, SaveOptions};
use colored::Colorize;
use std::path::Path;

/// Read `input` and save it in the format of `output`'s suffix
pub fn run(input: &Path, output: &Path, show_progress: bool) -> Result<()> {
    let records = read_file(input, &ReadOptions::default().show_progress(show_progress))?;
    save_file(output, &records, &SaveOptions::default())?;

    println!(
        "{} Converted {} record(s) to {}",
        "✓".green(),
        records.len(),
        output.display()
    );
    Ok(())
}
