// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three locked collections the engine owns, and the strict
//! acquisition order (items → queue-order → workers) mandated by §5.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use rq_core::{ItemId, QueueItem};

use crate::config::CancelToken;

/// Where a finished worker's outcome gets reported (§9 design note:
/// "message passing... the supervisor is the sole writer to `items`").
#[derive(Debug, Clone)]
pub enum WorkerOutcome {
    Finished,
    Failed { stderr: String },
}

/// Sent by a worker thread to the supervisor when `target_function`
/// returns or panics. The supervisor applies it only if `id` is still in
/// `running_workers` — if `Stop`/`force_stop_all_running` already
/// finalized the item, this message is a stale no-op (§4.4.1 `stop`).
#[derive(Debug, Clone)]
pub struct WorkerCompletion {
    pub id: ItemId,
    pub outcome: WorkerOutcome,
}

/// What the supervisor keeps about a dispatched worker.
///
/// Registered as a placeholder (`log_path` empty, `join: None`) the
/// instant the item's status flips to `Running`, before its log file or
/// worker thread exist, so `Stop` can always find a `Running` item here.
pub struct WorkerHandle {
    pub name: String,
    pub log_path: String,
    pub cancel: CancelToken,
    /// Kept so the handle isn't dropped (and the thread detached in the
    /// OS sense it already is) before the engine itself shuts down;
    /// never joined synchronously from async code. `None` until the
    /// worker thread has actually been spawned.
    #[allow(dead_code)]
    pub join: Option<std::thread::JoinHandle<()>>,
}

/// Guards `items` and `log_paths` together (§5: both are the "items
/// lock").
#[derive(Default)]
pub struct ItemsState {
    pub items: HashMap<ItemId, QueueItem>,
    pub log_paths: HashMap<ItemId, (String, String)>,
}

/// The engine's three locked collections (§4.4, §5).
///
/// Acquisition order when more than one is needed: `items`, then
/// `queue_order`, then `workers` — every call site in this crate that
/// takes more than one lock follows that order.
#[derive(Default)]
pub struct EngineState {
    pub items: Mutex<ItemsState>,
    pub queue_order: Mutex<VecDeque<ItemId>>,
    pub running_workers: Mutex<HashMap<ItemId, WorkerHandle>>,
}
