//! `bedrockx filter` command implementation

use crate::error::Result;
use bedrockx_common::RecordKey;
use bedrockx_process::file::{read_file, read_key_set, save_file, ReadOptions, SaveOptions};
use bedrockx_process::records::{filter_records, KeySource};
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Drop records whose `key` is listed in `values` or in `exclude_file`.
///
/// Listed values match integer keys when they parse as integers and string
/// keys otherwise.
pub fn run(
    input: &Path,
    output: &Path,
    key: &str,
    values: &[String],
    exclude_file: Option<&Path>,
    show_progress: bool,
) -> Result<()> {
    let opts = ReadOptions::default().show_progress(show_progress);

    let exclude: HashSet<RecordKey> = match exclude_file {
        Some(path) => read_key_set(path, key, &opts)?,
        None => values.iter().map(|v| RecordKey::parse_loose(v)).collect(),
    };
    debug!(excluded = exclude.len(), key, "Loaded exclusion set");

    let records = read_file(input, &opts)?;
    let original = records.len();
    let kept = filter_records(records, &exclude, KeySource::Column(key))?;
    save_file(output, &kept, &SaveOptions::default())?;

    println!(
        "{} Kept {} of {} record(s) in {}",
        "✓".green(),
        kept.len(),
        original,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use bedrockx_common::BedrockError;

    fn write_input(dir: &Path) -> std::path::PathBuf {
        let input = dir.join("in.jsonl");
        std::fs::write(
            &input,
            "{\"id\":1,\"name\":\"Alice\"}\n{\"id\":2,\"name\":\"Bob\"}\n{\"id\":3,\"name\":\"Charlie\"}\n",
        )
        .unwrap();
        input
    }

    fn names(path: &Path) -> Vec<String> {
        read_file(path, &ReadOptions::default())
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_filter_by_values() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("out.jsonl");

        run(&input, &output, "id", &["2".to_string()], None, false).unwrap();
        assert_eq!(names(&output), vec!["Alice", "Charlie"]);
    }

    #[test]
    fn test_filter_by_exclude_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let exclude = dir.path().join("exclude.csv");
        std::fs::write(&exclude, "name\nAlice\nCharlie\n").unwrap();
        let output = dir.path().join("out.json");

        run(&input, &output, "name", &[], Some(exclude.as_path()), false).unwrap();
        assert_eq!(names(&output), vec!["Bob"]);
    }

    #[test]
    fn test_missing_key_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());

        let err = run(&input, &dir.path().join("out.jsonl"), "email", &["x".to_string()], None, false)
            .unwrap_err();
        assert!(matches!(err, CliError::Data(BedrockError::MissingKey { .. })));
    }
}
