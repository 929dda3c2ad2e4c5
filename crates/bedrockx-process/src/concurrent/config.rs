//! Processor configuration and validation

use crate::error::ProcessError;
use bedrockx_common::FileFormat;
use std::path::{Path, PathBuf};

/// Construction parameters for a [`super::BatchProcessor`]
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Number of worker threads
    pub max_workers: usize,
    /// Output file; parent directories are created on first write
    pub destination: PathBuf,
    /// Explicit output format; inferred from `destination` when `None`
    pub format: Option<String>,
    /// Draw a progress bar while the batch runs
    pub show_progress: bool,
}

impl ProcessorConfig {
    pub fn builder(max_workers: usize, destination: impl Into<PathBuf>) -> ProcessorConfigBuilder {
        ProcessorConfigBuilder {
            config: ProcessorConfig {
                max_workers,
                destination: destination.into(),
                format: None,
                show_progress: false,
            },
        }
    }

    /// Check the worker count and resolve the output format.
    ///
    /// Touches nothing on disk.
    pub(crate) fn validate(&self) -> Result<FileFormat, ProcessError> {
        if self.max_workers == 0 {
            return Err(ProcessError::config(
                "max_workers must be a positive integer, got 0",
            ));
        }

        let format = FileFormat::resolve(self.format.as_deref(), &self.destination)
            .map_err(|_| unsupported(self.format.as_deref(), &self.destination))?;

        if !format.supports_append() {
            return Err(unsupported(Some(format.as_str()), &self.destination));
        }

        Ok(format)
    }
}

fn unsupported(explicit: Option<&str>, destination: &Path) -> ProcessError {
    let value = match explicit {
        Some(format) => format.to_string(),
        None => destination
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default(),
    };
    ProcessError::config(format!(
        "unsupported output format '{}' for {}; the processor appends records and only supports 'jsonl'",
        value,
        destination.display()
    ))
}

/// Builder for [`ProcessorConfig`]
#[derive(Debug, Clone)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.config.format = Some(format.into());
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    pub fn build(self) -> ProcessorConfig {
        self.config
    }
}
