//! bedrockx CLI Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Command-line front end for the bedrockx data-wrangling toolkit.
//!
//! - **Conversion**: rewrite a file in another format (`bedrockx convert`)
//! - **Deduplication**: keep the first record per key (`bedrockx dedup`)
//! - **Filtering**: drop records by key (`bedrockx filter`)
//! - **Column removal**: strip columns through the worker pool (`bedrockx drop-columns`)

pub mod commands;
pub mod config;
pub mod error;

pub use config::CliConfig;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bedrockx - structured record wrangling
#[derive(Parser, Debug)]
#[command(name = "bedrockx")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show progress bars
    #[arg(long, global = true)]
    pub progress: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite INPUT in the format implied by OUTPUT's suffix
    Convert {
        /// Input file (jsonl, json or csv)
        input: PathBuf,

        /// Output file (jsonl, json or csv)
        output: PathBuf,
    },

    /// Keep the first record for each value of a key column
    Dedup {
        input: PathBuf,
        output: PathBuf,

        /// Key column
        #[arg(short, long)]
        key: String,
    },

    /// Drop records whose key appears in an exclusion list
    Filter {
        input: PathBuf,
        output: PathBuf,

        /// Key column
        #[arg(short, long)]
        key: String,

        /// Comma-separated key values to exclude
        #[arg(
            long,
            value_delimiter = ',',
            required_unless_present = "exclude_file",
            conflicts_with = "exclude_file"
        )]
        values: Vec<String>,

        /// File whose KEY column lists the values to exclude
        #[arg(long)]
        exclude_file: Option<PathBuf>,
    },

    /// Remove columns from every record using the concurrent processor.
    ///
    /// Results are appended to OUTPUT (jsonl only) in completion order.
    DropColumns {
        input: PathBuf,
        output: PathBuf,

        /// Comma-separated columns to remove
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Worker threads (defaults to BEDROCKX_WORKERS, then 4)
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_values_are_split() {
        let cli = Cli::try_parse_from([
            "bedrockx", "filter", "in.jsonl", "out.jsonl", "--key", "id", "--values", "1,2,abc",
        ])
        .unwrap();

        match cli.command {
            Commands::Filter { values, exclude_file, .. } => {
                assert_eq!(values, vec!["1", "2", "abc"]);
                assert!(exclude_file.is_none());
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_filter_requires_a_source() {
        let result = Cli::try_parse_from(["bedrockx", "filter", "in.jsonl", "out.jsonl", "--key", "id"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "bedrockx", "filter", "in.jsonl", "out.jsonl", "--key", "id", "--values", "1",
            "--exclude-file", "ids.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_drop_columns_args() {
        let cli = Cli::try_parse_from([
            "bedrockx", "--verbose", "drop-columns", "in.csv", "out.jsonl", "-c", "age,city", "-w", "8",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::DropColumns { columns, workers, .. } => {
                assert_eq!(columns, vec!["age", "city"]);
                assert_eq!(workers, Some(8));
            },
            other => panic!("unexpected command {other:?}"),
        }
    }
}
