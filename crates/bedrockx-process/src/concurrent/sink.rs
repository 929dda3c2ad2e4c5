//! Serialized writes to the batch destination

use crate::file::JsonlAppender;
use bedrockx_common::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Shared `jsonl` writer used by every worker of a batch.
///
/// The file is opened on the first append, so a batch that produces nothing
/// leaves the filesystem untouched.
#[derive(Debug)]
pub struct ResultSink {
    destination: PathBuf,
    appender: Mutex<Option<JsonlAppender>>,
}

impl ResultSink {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            appender: Mutex::new(None),
        }
    }

    /// Append one result as a complete line.
    ///
    /// Serialization happens before the lock is taken; only the write is
    /// serialized across workers.
    pub fn append<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let line = serde_json::to_string(value)?;

        let mut guard = self.appender.lock().unwrap_or_else(|e| e.into_inner());
        let appender = match guard.take() {
            Some(appender) => appender,
            None => JsonlAppender::open(&self.destination)?,
        };
        guard.insert(appender).append_line(&line)
    }

    /// Sync written data to disk; a no-op if nothing was written
    pub fn finish(&self) -> Result<()> {
        let mut guard = self.appender.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_mut() {
            Some(appender) => appender.sync(),
            None => Ok(()),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}
