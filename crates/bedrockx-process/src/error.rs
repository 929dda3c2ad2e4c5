//! Error types for the batch processor
//!
//! Configuration and missing-hook errors abort a batch before any result is
//! written. Per-item failures are collected while the batch drains and are
//! reported once, together, after every successful result has been flushed.

use bedrockx_common::BedrockError;
use thiserror::Error;

/// One job that failed inside the worker pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Position of the record in the submitted batch
    pub index: usize,
    /// Rendered cause, including any context chain
    pub cause: String,
}

impl std::fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}: {}", self.index, self.cause)
    }
}

/// Errors raised by [`crate::concurrent::BatchProcessor`]
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Invalid worker count or an unsupported output format
    #[error("Configuration error: {0}")]
    Config(String),

    /// The processing hook was never overridden
    #[error("Process hook is not implemented. Override `ProcessHook::process` or use `hook_fn`.")]
    UnimplementedHook,

    /// One or more records failed; the rest were written
    #[error("{} of {submitted} item(s) failed: {}", .failures.len(), summarize(.failures))]
    ItemProcessing {
        submitted: usize,
        failures: Vec<ItemFailure>,
    },

    /// The blocking batch task could not be joined
    #[error("Worker task failed: {0}")]
    Worker(String),

    /// Writing to the destination failed
    #[error(transparent)]
    Sink(#[from] BedrockError),
}

impl ProcessError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Failed items, if this is an aggregate failure
    pub fn failures(&self) -> &[ItemFailure] {
        match self {
            Self::ItemProcessing { failures, .. } => failures,
            _ => &[],
        }
    }
}

fn summarize(failures: &[ItemFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_message_lists_every_item() {
        let err = ProcessError::ItemProcessing {
            submitted: 5,
            failures: vec![
                ItemFailure { index: 1, cause: "bad id".into() },
                ItemFailure { index: 4, cause: "timeout".into() },
            ],
        };

        let msg = err.to_string();
        assert!(msg.starts_with("2 of 5 item(s) failed"));
        assert!(msg.contains("#1: bad id"));
        assert!(msg.contains("#4: timeout"));
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn test_non_aggregate_has_no_failures() {
        assert!(ProcessError::UnimplementedHook.failures().is_empty());
    }
}
