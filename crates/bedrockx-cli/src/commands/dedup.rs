//! `bedrockx dedup` command implementation

use crate::error::Result;
use bedrockx_process::file::{read_file, save_file, ReadOptions, SaveOptions};
use bedrockx_process::records::{drop_duplicates, KeySource};
use colored::Colorize;
use std::path::Path;

/// Keep the first record for each value of `key`
pub fn run(input: &Path, output: &Path, key: &str, show_progress: bool) -> Result<()> {
    let records = read_file(input, &ReadOptions::default().show_progress(show_progress))?;
    let original = records.len();

    let unique = drop_duplicates(records, KeySource::Column(key));
    save_file(output, &unique, &SaveOptions::default())?;

    println!(
        "{} Kept {} of {} record(s) in {}",
        "✓".green(),
        unique.len(),
        original,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_by_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.jsonl");
        std::fs::write(&input, "id,name\n1,Alice\n2,Bob\n1,Alice Copy\n").unwrap();

        run(&input, &output, "id", false).unwrap();

        let records = read_file(&output, &ReadOptions::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Alice");
    }
}
