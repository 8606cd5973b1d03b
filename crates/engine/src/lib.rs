// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rq-engine: the RunQueue state machine, worker-pool supervisor, log
//! capture, and persistence glue (§4.3, §4.4).
//!
//! [`RunQueue`] owns the three locked collections from [`state`] directly
//! and implements [`rq_core::RunQueueApi`] natively — `rq-server` wraps
//! one and forwards calls over the wire; `rq-client::RunQueueProxy`
//! implements the same trait by forwarding instead (§4.6, §4.7).

pub mod api_impl;
pub mod config;
pub mod log_capture;
pub mod log_relay;
pub mod mutations;
pub mod persistence;
pub mod queries;
pub mod state;
pub mod supervisor;
pub mod ticker;
mod util;
mod worker;

#[cfg(test)]
mod lib_tests;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rq_core::clock::{Clock, SystemClock};
use rq_core::id::IdAllocator;
use rq_core::{Event, LogRecord};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::warn;

pub use config::{CancelToken, EngineConfig, TargetError, TargetFunction, WorkerContext};
pub use state::{EngineState, WorkerCompletion, WorkerHandle, WorkerOutcome};

/// Capacity of the broadcast channel fanning out [`Event`]s to local
/// subscribers (§4.7). A slow subscriber that falls this far behind
/// starts missing events — the ticker (§4.4.3) exists precisely so a
/// subscriber that lagged can reconcile from the next full snapshot.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// The RunQueue engine (§4.4): item map, queue order, worker-pool
/// supervisor, log capture, ticker, log relay, persistence.
pub struct RunQueue {
    pub(crate) state: EngineState,
    pub(crate) id_alloc: IdAllocator,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) pool_size: AtomicI64,
    pub(crate) autoprocess: AtomicBool,
    pub(crate) stopping: AtomicBool,
    pub(crate) events_tx: broadcast::Sender<Event>,
    pub(crate) log_tx: mpsc::UnboundedSender<LogRecord>,
    log_rx: Mutex<Option<mpsc::UnboundedReceiver<LogRecord>>>,
    pub(crate) completion_tx: mpsc::UnboundedSender<WorkerCompletion>,
    completion_rx: Mutex<Option<mpsc::UnboundedReceiver<WorkerCompletion>>>,
    pub(crate) target_function: Arc<dyn TargetFunction>,
    pub(crate) log_dir: PathBuf,
}

impl RunQueue {
    /// Construct a fresh engine with no items, using the real wall clock.
    pub fn new(config: EngineConfig) -> std::io::Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Construct with an explicit [`Clock`], for deterministic tests.
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> std::io::Result<Self> {
        if config.create_log_dir {
            std::fs::create_dir_all(&config.log_dir)?;
        }
        let (events_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (log_tx, log_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Ok(Self {
            state: EngineState::default(),
            id_alloc: IdAllocator::default(),
            clock,
            pool_size: AtomicI64::new(config.pool_size),
            autoprocess: AtomicBool::new(false),
            stopping: AtomicBool::new(false),
            events_tx,
            log_tx,
            log_rx: Mutex::new(Some(log_rx)),
            completion_tx,
            completion_rx: Mutex::new(Some(completion_rx)),
            target_function: config.target_function,
            log_dir: config.log_dir,
        })
    }

    /// Subscribe to engine events (§4.7). Fresh subscribers only observe
    /// events published after this call; use [`queries`] for a snapshot of
    /// current state.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    /// Publish `event` to every local subscriber. A send failing because
    /// no one is listening is not an error (§4.7: events are fire-and-forget).
    pub(crate) fn publish(&self, event: Event) {
        let _ = self.events_tx.send(event);
    }

    pub(crate) fn now(&self) -> i64 {
        self.clock.epoch_ms()
    }

    /// Start the three long-running tasks: supervisor, ticker, log relay
    /// (§4.4.2–§4.4.4). Returns their [`JoinHandle`]s; the caller (`rq-cli`,
    /// `rq-server`) owns them and aborts them as part of its own shutdown
    /// sequence (§4.5).
    ///
    /// Calling this more than once on the same engine returns an empty
    /// `Vec` for the second call onward — the channels it hands to the
    /// tasks can only be taken once.
    pub fn start(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let log_rx = self.log_rx.lock().take();
        let completion_rx = self.completion_rx.lock().take();
        let (Some(log_rx), Some(completion_rx)) = (log_rx, completion_rx) else {
            warn!("RunQueue::start called more than once; ignoring");
            return Vec::new();
        };

        vec![
            tokio::task::spawn(supervisor::run(Arc::clone(self), completion_rx)),
            tokio::task::spawn(ticker::run(Arc::clone(self))),
            tokio::task::spawn(log_relay::run(Arc::clone(self), log_rx)),
        ]
    }

    /// Signal the supervisor to stop dispatching new work and exit once
    /// every running worker has finished (§4.4.2 step 1). Does not itself
    /// terminate running workers — pair with [`mutations`]'s
    /// `force_stop_all_running` for a hard stop.
    pub fn request_shutdown(&self) {
        self.stopping.store(true, Ordering::SeqCst);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }
}
