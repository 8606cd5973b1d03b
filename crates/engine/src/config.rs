// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine construction config and the `target_function` contract (§4.3,
//! §4.4, §6).
//!
//! A plain struct with no `load`-from-disk story of its own — the engine
//! has no XDG state directory; the caller (`rq-cli`, or a test) hands in
//! explicit paths.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rq_core::QueueItemConfig;

/// Construction config for [`crate::RunQueue`] (§6: "pool_size, log_dir,
/// create_log_dir, target_function").
#[derive(Clone)]
pub struct EngineConfig {
    /// `-1` means unlimited (§4.4.1 `set_pool_size`).
    pub pool_size: i64,
    pub log_dir: PathBuf,
    pub create_log_dir: bool,
    pub target_function: Arc<dyn TargetFunction>,
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("pool_size", &self.pool_size)
            .field("log_dir", &self.log_dir)
            .field("create_log_dir", &self.create_log_dir)
            .finish_non_exhaustive()
    }
}

/// Cooperative cancellation observed by a [`TargetFunction`] (§5: "Stop...
/// is a hard termination of the OS process"). A worker here is an OS
/// thread rather than a process (DESIGN.md), so a truly forced kill is
/// not available; `Stop`/`force_stop_all_running` flip this flag and the
/// engine immediately treats the item as `Stopped` regardless of whether
/// the thread has noticed yet (§5: "any in-flight log events the worker
/// had not yet flushed may be lost" — the same is true of its eventual
/// completion message, which the supervisor discards once the id is no
/// longer in `running_workers`).
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The error a [`TargetFunction`] reports, carrying the information §4.4.2
/// formats into `stderr` as `"{ExceptionType}: {message}"`.
#[derive(Debug, Clone)]
pub struct TargetError {
    pub kind: String,
    pub message: String,
}

impl TargetError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.message)
    }
}

/// A handle the worker thread gives `target_function` so it can emit log
/// lines (routed into both the per-item log file and the log-event
/// channel, §4.3) and observe cancellation.
///
/// Stands in for true fd-level stdout/stderr redirection, which has no
/// meaning for an in-process worker thread (only a child process has its
/// own fds) — see DESIGN.md for why the worker is a thread, not a
/// process.
pub struct WorkerContext {
    pub(crate) logger: crate::log_capture::LogCapture,
    pub(crate) cancel: CancelToken,
}

impl WorkerContext {
    /// Emit one log line, appended to the per-item log file and published
    /// on the engine's log-event channel (§3, §4.3).
    pub fn log(&self, message: impl AsRef<str>) {
        self.logger.append(message.as_ref());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// The user-supplied compute task, invoked once per queue item inside a
/// worker thread (§6 "Target-function contract").
///
/// A clean `Ok(())` return means `Finished`; `Err` means `Failed` with
/// the returned [`TargetError`] recorded verbatim; an unwinding panic is
/// caught by the worker and reported as `TargetError::new("Panic", ...)`.
pub trait TargetFunction: Send + Sync {
    fn run(&self, config: &QueueItemConfig, ctx: &WorkerContext) -> Result<(), TargetError>;
}

/// Adapt a plain closure into a [`TargetFunction`], for tests and small
/// CLIs that don't need a named type.
impl<F> TargetFunction for F
where
    F: Fn(&QueueItemConfig, &WorkerContext) -> Result<(), TargetError> + Send + Sync,
{
    fn run(&self, config: &QueueItemConfig, ctx: &WorkerContext) -> Result<(), TargetError> {
        self(config, ctx)
    }
}
