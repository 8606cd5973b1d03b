// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence glue bridging the engine's in-memory state and
//! [`rq_storage::PersistRecord`] (§4.4.6).
//!
//! These are plain inherent methods on [`RunQueue`], not part of
//! [`rq_core::RunQueueApi`] — persistence is a local concern of whichever
//! process owns the workspace (`rq-cli`, `rq-server`), never something a
//! remote client invokes directly.

use std::path::Path;

use rq_core::{Event, RunQueueError, Status};
use rq_storage::PersistRecord;

use crate::RunQueue;

/// Every failure mode reachable while saving or loading a snapshot: either
/// the engine-level precondition in [`RunQueue::snapshot_for_persist`] or
/// the storage layer's own codec/IO errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Queue(#[from] RunQueueError),

    #[error(transparent)]
    Storage(#[from] rq_storage::StorageError),
}

impl RunQueue {
    /// Build a [`PersistRecord`] from current state (§4.4.6).
    ///
    /// Fails with [`RunQueueError::HasRunningItems`] if any item is
    /// currently running and `save_running_as_stopped` is `false`; when
    /// `true`, every running item is recorded as `Stopped` in the
    /// returned snapshot (live engine state is not touched).
    pub async fn snapshot_for_persist(&self, save_running_as_stopped: bool) -> Result<PersistRecord, RunQueueError> {
        let items_guard = self.state.items.lock();
        let queue_guard = self.state.queue_order.lock();
        let workers_guard = self.state.running_workers.lock();

        if !workers_guard.is_empty() && !save_running_as_stopped {
            return Err(RunQueueError::HasRunningItems);
        }

        let mut items = items_guard.items.clone();
        if !workers_guard.is_empty() {
            let now = self.now();
            for id in workers_guard.keys() {
                if let Some(item) = items.get_mut(id) {
                    item.status = Status::Stopped;
                    item.stderr = "running at snapshot".to_string();
                    item.dt_done = Some(now);
                }
            }
        }

        let queue_order = queue_guard.iter().copied().collect();
        let next_id = self.id_alloc.peek();
        Ok(PersistRecord::new(items, queue_order, next_id))
    }

    /// Replace `items`, `queue_order`, and the id allocator's counter with
    /// `record`'s contents atomically, then emit `ResetTriggered` (§4.4.6).
    ///
    /// Running workers are left untouched — loading a record is meant for
    /// startup, before any worker has been dispatched.
    pub async fn load_from_record(&self, record: PersistRecord) {
        {
            let mut items_guard = self.state.items.lock();
            let mut queue_guard = self.state.queue_order.lock();
            items_guard.items = record.items;
            items_guard.log_paths.clear();
            *queue_guard = record.queue_order.into_iter().collect();
        }
        self.id_alloc.reset(record.next_id);
        self.publish(Event::ResetTriggered);
    }

    /// Snapshot current state and write it to `path` (§4.4.6).
    pub async fn save_to(&self, path: &Path, save_running_as_stopped: bool) -> Result<(), PersistError> {
        let record = self.snapshot_for_persist(save_running_as_stopped).await?;
        record.save(path)?;
        Ok(())
    }

    /// Load a previously saved record from `path`. Returns `Ok(false)`
    /// without modifying state if `path` does not exist (fresh workspace).
    pub async fn load_from_path(&self, path: &Path) -> Result<bool, PersistError> {
        match PersistRecord::load(path)? {
            Some(record) => {
                self.load_from_record(record).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
