// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The supervisor task: pops queued work and dispatches it to worker
//! threads, reaps their completions, and winds down once
//! [`RunQueue::request_shutdown`] has been called and the pool is empty
//! (§4.4.2).
//!
//! Ordering guarantees this module upholds:
//! - Pop, status-flip to `Running`, and insertion into `running_workers`
//!   happen under one lock window so no external observer ever sees an id
//!   simultaneously in `queue_order` and `running_workers`.
//! - `NewConsoleOutputPath` is published after the log file exists and
//!   before the worker thread is spawned.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use rq_core::{Event, ItemId, QueueItemConfig, Status};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::CancelToken;
use crate::state::{WorkerCompletion, WorkerHandle, WorkerOutcome};
use crate::util;
use crate::RunQueue;

/// How long the supervisor sleeps between dispatch passes when no
/// completion has arrived — bounds the latency of noticing newly queued
/// work or a pool-size change without busy-looping.
const IDLE_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) async fn run(engine: Arc<RunQueue>, mut completion_rx: UnboundedReceiver<WorkerCompletion>) {
    loop {
        while dispatch_one(&engine) {}

        if engine.is_shutting_down() && engine.state.running_workers.lock().is_empty() {
            return;
        }

        tokio::select! {
            maybe = completion_rx.recv() => {
                match maybe {
                    Some(completion) => apply_completion(&engine, completion),
                    None => return,
                }
            }
            _ = tokio::time::sleep(IDLE_INTERVAL) => {}
        }
    }
}

/// Attempt to dispatch exactly one queued item. Returns `false` if
/// autoprocessing is off, the pool is full, or the queue is empty.
fn dispatch_one(engine: &Arc<RunQueue>) -> bool {
    if !engine.autoprocess.load(Ordering::SeqCst) {
        return false;
    }

    let Some((id, name, config, cancel)) = pop_for_dispatch(engine) else {
        return false;
    };
    // `id` is now registered in `running_workers` (placeholder, no
    // thread yet) so `Stop` can observe and act on it for the rest of
    // this function — see `pop_for_dispatch`.

    let path = crate::log_capture::choose_log_path(&engine.log_dir, id, &name);
    if let Err(err) = std::fs::File::create(&path) {
        tracing::error!(item_id = %id, %err, "failed to create log file; marking item Failed");
        mark_dispatch_failure(engine, id, &format!("IoError:{err}"));
        return true;
    }

    engine.publish(Event::NewConsoleOutputPath {
        id,
        name: name.clone(),
        path: path.to_string_lossy().into_owned(),
    });

    {
        let mut items_guard = engine.state.items.lock();
        items_guard
            .log_paths
            .insert(id, (name.clone(), path.to_string_lossy().into_owned()));
    }

    let logger = match crate::log_capture::LogCapture::open(
        id,
        name.clone(),
        path.clone(),
        Arc::clone(&engine.clock),
        engine.log_tx.clone(),
    ) {
        Ok(logger) => logger,
        Err(err) => {
            tracing::error!(item_id = %id, %err, "failed to open log file for writing; marking item Failed");
            mark_dispatch_failure(engine, id, &format!("IoError:{err}"));
            return true;
        }
    };

    let target_function = Arc::clone(&engine.target_function);
    let completion_tx = engine.completion_tx.clone();
    let worker_cancel = cancel;
    let join = std::thread::spawn(move || {
        crate::worker::run_worker(id, config, logger, worker_cancel, target_function, completion_tx);
    });

    {
        let mut workers_guard = engine.state.running_workers.lock();
        if let Some(handle) = workers_guard.get_mut(&id) {
            handle.log_path = path.to_string_lossy().into_owned();
            handle.join = Some(join);
        }
        // else: `Stop` already removed the placeholder while the log file
        // was being prepared; the thread above still runs to completion
        // (detached) and its eventual `WorkerCompletion` is a stale no-op.
    }
    engine.publish(Event::RunningIdsChanged {
        ids: util::running_ids_snapshot(&engine.state),
    });
    true
}

/// Pop the next queued item if the pool has room, flipping it to
/// `Running` and registering a placeholder [`WorkerHandle`] in
/// `running_workers` — all under one `items`→`queue_order`→`workers` lock
/// window (§5), so no external observer ever sees `id` in neither
/// `queue_order` nor `running_workers` (§4.4.2's ordering guarantee). The
/// handle's `join` is filled in once the worker thread actually exists;
/// until then its `cancel` token alone is enough for `stop()` to act on.
fn pop_for_dispatch(engine: &RunQueue) -> Option<(ItemId, String, QueueItemConfig, CancelToken)> {
    let mut items_guard = engine.state.items.lock();
    let mut queue_guard = engine.state.queue_order.lock();
    let mut workers_guard = engine.state.running_workers.lock();

    let pool_size = engine.pool_size.load(Ordering::SeqCst);
    if pool_size != -1 && workers_guard.len() as i64 >= pool_size {
        return None;
    }

    let id = queue_guard.pop_front()?;
    let item = items_guard.items.get_mut(&id)?;
    item.status = Status::Running;
    item.dt_started = Some(engine.now());
    let name = item.name.clone();
    let config = item.config.clone();

    let cancel = CancelToken::new();
    workers_guard.insert(
        id,
        WorkerHandle {
            name: name.clone(),
            log_path: String::new(),
            cancel: cancel.clone(),
            join: None,
        },
    );

    Some((id, name, config, cancel))
}

fn mark_dispatch_failure(engine: &RunQueue, id: ItemId, stderr: &str) {
    let item_after = {
        let mut items_guard = engine.state.items.lock();
        let mut workers_guard = engine.state.running_workers.lock();
        workers_guard.remove(&id);
        items_guard.items.get_mut(&id).map(|item| {
            item.status = Status::Failed;
            item.exit_code = Some(-1);
            item.stderr = stderr.to_string();
            item.dt_done = Some(engine.now());
            item.clone()
        })
    };
    if let Some(item) = item_after {
        engine.publish(Event::ItemChanged { id, item });
    }
    engine.publish(Event::RunningIdsChanged {
        ids: util::running_ids_snapshot(&engine.state),
    });
}

/// Apply a worker's outcome, unless `Stop`/`force_stop_all_running`
/// already removed it from `running_workers` — in that case this
/// completion is a stale no-op (§4.4.1 `stop`).
fn apply_completion(engine: &RunQueue, completion: WorkerCompletion) {
    let id = completion.id;
    let mut items_guard = engine.state.items.lock();
    let mut workers_guard = engine.state.running_workers.lock();

    if workers_guard.remove(&id).is_none() {
        return;
    }
    let running_ids = util::running_ids_from_map(&workers_guard);

    let item_after = items_guard.items.get_mut(&id).map(|item| {
        match completion.outcome {
            WorkerOutcome::Finished => {
                item.status = Status::Finished;
                item.exit_code = Some(0);
            }
            WorkerOutcome::Failed { stderr } => {
                item.status = Status::Failed;
                item.exit_code = Some(-1);
                item.stderr = stderr;
            }
        }
        item.dt_done = Some(engine.now());
        item.clone()
    });

    drop(workers_guard);
    drop(items_guard);

    if let Some(item) = item_after {
        engine.publish(Event::ItemChanged { id, item });
    }
    engine.publish(Event::RunningIdsChanged { ids: running_ids });
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
