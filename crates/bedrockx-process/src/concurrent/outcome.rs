//! Shared bookkeeping for one batch run

use crate::error::{ItemFailure, ProcessError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, info};

/// Lifecycle of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Idle,
    Dispatching,
    Draining,
    Done,
}

impl std::fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BatchPhase::Idle => "idle",
            BatchPhase::Dispatching => "dispatching",
            BatchPhase::Draining => "draining",
            BatchPhase::Done => "done",
        };
        f.write_str(s)
    }
}

/// Counters, failures and phase of a running batch.
///
/// Updated concurrently by every worker.
#[derive(Debug)]
pub struct BatchOutcome {
    submitted: usize,
    started: AtomicUsize,
    written: AtomicUsize,
    dropped: AtomicUsize,
    failures: Mutex<Vec<ItemFailure>>,
    aborted: AtomicBool,
    phase: Mutex<BatchPhase>,
}

impl BatchOutcome {
    pub fn new(submitted: usize) -> Self {
        Self {
            submitted,
            started: AtomicUsize::new(0),
            written: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
            failures: Mutex::new(Vec::new()),
            aborted: AtomicBool::new(false),
            phase: Mutex::new(BatchPhase::Idle),
        }
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn phase(&self) -> BatchPhase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn enter(&self, next: BatchPhase) {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        let previous = *phase;
        if previous != next {
            debug!(from = %previous, to = %next, "Batch phase changed");
            *phase = next;
        }
    }

    /// Count a dispatched job; returns `true` for the last one of the batch
    pub(crate) fn record_started(&self) -> bool {
        self.started.fetch_add(1, Ordering::SeqCst) + 1 == self.submitted
    }

    pub(crate) fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, index: usize, cause: String) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ItemFailure { index, cause });
    }

    /// Stop workers from pulling further jobs
    pub(crate) fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    pub(crate) fn log_summary(&self) {
        info!(
            submitted = self.submitted,
            written = self.written(),
            dropped = self.dropped(),
            failed = self.failed(),
            aborted = self.is_aborted(),
            "Batch finished"
        );
    }

    /// Aggregate failure, sorted by input position, if any item failed
    pub(crate) fn into_error(self) -> Option<ProcessError> {
        let mut failures = self.failures.into_inner().unwrap_or_else(|e| e.into_inner());
        if failures.is_empty() {
            return None;
        }
        failures.sort_by_key(|f| f.index);
        Some(ProcessError::ItemProcessing {
            submitted: self.submitted,
            failures,
        })
    }
}
