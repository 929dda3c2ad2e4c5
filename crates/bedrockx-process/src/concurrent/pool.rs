//! Worker pool and batch controller

use super::config::ProcessorConfig;
use super::hook::{HookError, ProcessHook};
use super::job::Job;
use super::outcome::{BatchOutcome, BatchPhase};
use super::sink::ResultSink;
use crate::error::ProcessError;
use crate::progress::record_progress;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Runs a [`ProcessHook`] over batches of records with bounded parallelism.
///
/// At most `max_workers` records are in flight at once. Every non-empty
/// result is appended to the configured `jsonl` destination as soon as its
/// record finishes.
#[derive(Debug)]
pub struct BatchProcessor<H> {
    config: ProcessorConfig,
    hook: H,
    pool: ThreadPool,
}

/// What happened to a single job
enum Step {
    Written,
    Dropped,
    Aborted,
    Failed(String),
    Panicked(String),
}

impl<H: ProcessHook> BatchProcessor<H> {
    /// Validate `config` and bind it to `hook`.
    ///
    /// Fails with [`ProcessError::Config`] for a zero worker count or an
    /// output format that cannot be appended to. Nothing is created on disk.
    pub fn new(config: ProcessorConfig, hook: H) -> Result<Self, ProcessError> {
        let format = config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(|i| format!("bedrockx-worker-{i}"))
            .build()
            .map_err(|e| ProcessError::Worker(format!("failed to start worker pool: {}", e)))?;

        debug!(
            workers = config.max_workers,
            destination = %config.destination.display(),
            %format,
            "Batch processor configured"
        );
        Ok(Self { config, hook, pool })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// Process every record and block until the batch has drained.
    ///
    /// A record whose hook fails or panics is reported in
    /// [`ProcessError::ItemProcessing`] after all other results are written.
    /// An unimplemented hook stops the batch with
    /// [`ProcessError::UnimplementedHook`].
    pub fn process_batch<R>(&self, records: R) -> Result<(), ProcessError>
    where
        R: IntoIterator<Item = H::Input>,
    {
        let jobs = Job::sequence(records);
        let outcome = BatchOutcome::new(jobs.len());
        let sink = ResultSink::new(&self.config.destination);
        let progress = record_progress(
            Some(outcome.submitted() as u64),
            "Processing",
            self.config.show_progress,
        );

        info!(
            submitted = outcome.submitted(),
            workers = self.config.max_workers.min(outcome.submitted()),
            destination = %sink.destination().display(),
            "Processing batch"
        );
        outcome.enter(BatchPhase::Dispatching);

        // One task per job; idle workers steal the next pending one
        let dispatched = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                jobs.into_par_iter().with_max_len(1).for_each(|job| {
                    if outcome.is_aborted() {
                        return;
                    }
                    if outcome.record_started() {
                        outcome.enter(BatchPhase::Draining);
                    }
                    self.run_job(job, &sink, &outcome);
                    progress.inc(1);
                })
            })
        }));

        progress.finish_and_clear();
        outcome.enter(BatchPhase::Draining);
        let flushed = sink.finish();
        outcome.enter(BatchPhase::Done);
        outcome.log_summary();

        if let Err(panic) = dispatched {
            let cause = panic_message(&*panic);
            error!(error = %cause, "Worker pool terminated abnormally");
            return Err(ProcessError::Worker(format!(
                "worker pool terminated abnormally: {}",
                cause
            )));
        }
        if outcome.is_aborted() {
            return Err(ProcessError::UnimplementedHook);
        }
        flushed?;

        match outcome.into_error() {
            Some(err) => {
                warn!(failed = err.failures().len(), "Batch completed with failures");
                Err(err)
            },
            None => Ok(()),
        }
    }

    fn run_job(&self, job: Job<H::Input>, sink: &ResultSink, outcome: &BatchOutcome) {
        let Job {
            payload,
            sequence_index: index,
        } = job;

        // Serialization runs user code too, so it stays inside the unwind guard
        let step = panic::catch_unwind(AssertUnwindSafe(|| match self.hook.process(&payload) {
            Ok(Some(output)) => match sink.append(&output) {
                Ok(()) => Step::Written,
                Err(err) => Step::Failed(format!("failed to write result: {}", err)),
            },
            Ok(None) => Step::Dropped,
            Err(HookError::Unimplemented) => Step::Aborted,
            Err(err) => Step::Failed(err.cause()),
        }))
        .unwrap_or_else(|panic| Step::Panicked(panic_message(&*panic)));

        match step {
            Step::Written => outcome.record_written(),
            Step::Dropped => {
                trace!(index, "Hook returned no result");
                outcome.record_dropped();
            },
            Step::Aborted => {
                error!("Process hook is not implemented; aborting batch");
                outcome.abort();
            },
            Step::Failed(cause) => {
                warn!(index, error = %cause, "Record failed");
                outcome.record_failure(index, cause);
            },
            Step::Panicked(message) => {
                let cause = format!("panicked: {}", message);
                error!(index, error = %cause, "Record failed");
                outcome.record_failure(index, cause);
            },
        }
    }
}

impl<H> BatchProcessor<H>
where
    H: ProcessHook + 'static,
    H::Input: 'static,
{
    /// Run [`Self::process_batch`] on tokio's blocking pool
    pub async fn process_batch_async(
        self: Arc<Self>,
        records: Vec<H::Input>,
    ) -> Result<(), ProcessError> {
        tokio::task::spawn_blocking(move || self.process_batch(records))
            .await
            .map_err(|e| ProcessError::Worker(e.to_string()))?
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
