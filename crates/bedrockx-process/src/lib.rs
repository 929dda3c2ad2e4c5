//! bedrockx Processing Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Structured-file I/O, record wrangling, and a bounded concurrent processor.
//!
//! # Modules
//!
//! - [`file`]: read `jsonl`/`json`/`csv` into records, save them back, append
//!   to line-delimited files
//! - [`records`]: filter by key set, drop duplicates, remove columns
//! - [`concurrent`]: run a per-record hook across a fixed worker pool and
//!   append every result to one `jsonl` file
//!
//! # Example
//!
//! ```no_run
//! use bedrockx_process::concurrent::{hook_fn, BatchProcessor, ProcessorConfig};
//! use bedrockx_process::file::{read_file, ReadOptions};
//! use bedrockx_common::Record;
//!
//! fn main() -> anyhow::Result<()> {
//!     let records = read_file("input.jsonl", &ReadOptions::default())?;
//!
//!     let hook = hook_fn(|record: &Record| {
//!         let mut out = record.clone();
//!         out.insert("processed".into(), true.into());
//!         Ok(Some(out))
//!     });
//!     let config = ProcessorConfig::builder(4, "output.jsonl").build();
//!     BatchProcessor::new(config, hook)?.process_batch(records)?;
//!     Ok(())
//! }
//! ```

pub mod concurrent;
pub mod error;
pub mod file;
pub mod progress;
pub mod records;

pub use error::{ItemFailure, ProcessError};
