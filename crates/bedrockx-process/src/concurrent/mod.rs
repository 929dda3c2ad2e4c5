//! Bounded concurrent record processor
//!
//! A [`BatchProcessor`] runs a [`ProcessHook`] over every record of a batch
//! on a fixed `rayon` pool of worker threads and appends each produced result
//! to a single `jsonl` destination.
//!
//! - Each record is its own task and idle workers steal pending ones, so a
//!   slow record only holds up its own worker.
//! - Results are written in completion order; there is no reordering buffer.
//! - One mutex guards the destination file, and every record is written as a
//!   whole line while it is held.
//! - A failing record does not stop its siblings. Failures are reported
//!   together as [`ProcessError::ItemProcessing`] once the batch has drained.
//!
//! [`ProcessError::ItemProcessing`]: crate::ProcessError::ItemProcessing

mod config;
mod hook;
mod job;
mod outcome;
mod pool;
mod sink;

pub use config::{ProcessorConfig, ProcessorConfigBuilder};
pub use hook::{hook_fn, BaseHook, FnHook, HookError, HookResult, ProcessHook};
pub use job::Job;
pub use outcome::{BatchOutcome, BatchPhase};
pub use pool::BatchProcessor;
pub use sink::ResultSink;
