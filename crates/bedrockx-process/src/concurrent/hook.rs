//! Per-record processing hooks

use bedrockx_common::Record;
use serde::Serialize;
use std::marker::PhantomData;
use thiserror::Error;

/// Why a hook produced no result for a record
#[derive(Error, Debug)]
pub enum HookError {
    /// The hook was never overridden; aborts the whole batch
    #[error("process hook is not implemented")]
    Unimplemented,

    /// Processing this record failed; siblings keep running
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl HookError {
    /// Render the cause with its full context chain
    pub(crate) fn cause(&self) -> String {
        match self {
            HookError::Unimplemented => self.to_string(),
            HookError::Failed(err) => format!("{:#}", err),
        }
    }
}

/// `Ok(None)` drops the record without writing anything
pub type HookResult<O> = Result<Option<O>, HookError>;

/// User-supplied transformation applied to each record of a batch.
///
/// Implementations are shared by every worker thread, so they must be
/// `Send + Sync`. Mutable state belongs behind a lock or an atomic.
///
/// ```
/// use bedrockx_process::concurrent::{HookResult, ProcessHook};
/// use bedrockx_common::Record;
///
/// struct Upper;
///
/// impl ProcessHook for Upper {
///     type Input = Record;
///     type Output = Record;
///
///     fn process(&self, record: &Record) -> HookResult<Record> {
///         let mut out = record.clone();
///         if let Some(name) = record.get("name").and_then(|v| v.as_str()) {
///             out.insert("name".into(), name.to_uppercase().into());
///         }
///         Ok(Some(out))
///     }
/// }
/// ```
pub trait ProcessHook: Send + Sync {
    type Input: Send;
    type Output: Serialize;

    fn process(&self, _item: &Self::Input) -> HookResult<Self::Output> {
        Err(HookError::Unimplemented)
    }
}

/// Hook that leaves `process` unimplemented
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseHook;

impl ProcessHook for BaseHook {
    type Input = Record;
    type Output = Record;
}

/// Closure adapter created by [`hook_fn`]
pub struct FnHook<F, I, O> {
    f: F,
    _marker: PhantomData<fn(&I) -> O>,
}

/// Wrap a closure as a [`ProcessHook`].
///
/// Errors returned by the closure become [`HookError::Failed`].
pub fn hook_fn<F, I, O>(f: F) -> FnHook<F, I, O>
where
    F: Fn(&I) -> anyhow::Result<Option<O>> + Send + Sync,
{
    FnHook {
        f,
        _marker: PhantomData,
    }
}

impl<F, I, O> ProcessHook for FnHook<F, I, O>
where
    F: Fn(&I) -> anyhow::Result<Option<O>> + Send + Sync,
    I: Send,
    O: Serialize,
{
    type Input = I;
    type Output = O;

    fn process(&self, item: &I) -> HookResult<O> {
        Ok((self.f)(item)?)
    }
}

impl<F, I, O> std::fmt::Debug for FnHook<F, I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHook").finish_non_exhaustive()
    }
}
