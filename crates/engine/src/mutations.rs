// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's mutating operations (§4.4.1). These are the inherent
//! methods [`crate::api_impl`] forwards to from its `RunQueueApi` impl.

use std::sync::atomic::Ordering;

use rq_core::action::legal_actions;
use rq_core::{Action, Event, ItemId, QueueItemConfig, RunQueueError, Status};

use crate::util;
use crate::RunQueue;

impl RunQueue {
    /// Allocate a fresh id, append the item to both `items` and
    /// `queue_order`, and emit `RunListChanged` then `QueueChanged` (§4.4.1,
    /// §8 happy-path scenario's observed event order).
    pub async fn add(&self, name: String, config: QueueItemConfig) -> Result<ItemId, RunQueueError> {
        let id = self.id_alloc.next();
        let now = self.now();
        let item = rq_core::QueueItem::new_queued(id, name, config, now);
        {
            let mut items_guard = self.state.items.lock();
            items_guard.items.insert(id, item);
        }
        {
            let mut queue_guard = self.state.queue_order.lock();
            queue_guard.push_back(id);
        }
        self.publish(Event::RunListChanged {
            items: util::items_snapshot_vec(&self.state),
        });
        self.publish(Event::QueueChanged {
            queue_order: util::queue_order_snapshot(&self.state),
        });
        Ok(id)
    }

    /// Remove `id` from `queue_order` and flip it to `Cancelled`. Requires
    /// `id` to currently be in `queue_order` (§4.4.1).
    pub async fn cancel(&self, id: ItemId) -> Result<(), RunQueueError> {
        let item_after = {
            let mut items_guard = self.state.items.lock();
            let mut queue_guard = self.state.queue_order.lock();
            if !util::remove_from_queue(&mut queue_guard, id) {
                return Err(RunQueueError::NotFound(id));
            }
            let item = items_guard.items.get_mut(&id).ok_or(RunQueueError::NotFound(id))?;
            item.status = Status::Cancelled;
            item.dt_done = Some(self.now());
            item.clone()
        };
        self.publish(Event::QueueChanged {
            queue_order: util::queue_order_snapshot(&self.state),
        });
        self.publish(Event::ItemChanged { id, item: item_after });
        Ok(())
    }

    /// Stop `id`, whether it is still queued or already running (§4.4.1,
    /// §5: stopping a running item is a hard termination — the worker
    /// thread's eventual completion message is discarded as stale).
    pub async fn stop(&self, id: ItemId) -> Result<(), RunQueueError> {
        {
            let mut items_guard = self.state.items.lock();
            let mut queue_guard = self.state.queue_order.lock();
            if util::remove_from_queue(&mut queue_guard, id) {
                if let Some(item) = items_guard.items.get_mut(&id) {
                    item.status = Status::Stopped;
                    item.dt_done = Some(self.now());
                    let item_after = item.clone();
                    let queue_order = queue_guard.iter().copied().collect();
                    drop(queue_guard);
                    drop(items_guard);
                    self.publish(Event::QueueChanged { queue_order });
                    self.publish(Event::ItemChanged { id, item: item_after });
                    return Ok(());
                }
            }
        }

        {
            let mut items_guard = self.state.items.lock();
            let mut workers_guard = self.state.running_workers.lock();
            if let Some(handle) = workers_guard.remove(&id) {
                handle.cancel.cancel();
                if let Some(item) = items_guard.items.get_mut(&id) {
                    item.status = Status::Stopped;
                    item.dt_done = Some(self.now());
                    let item_after = item.clone();
                    let running_ids = util::running_ids_from_map(&workers_guard);
                    drop(workers_guard);
                    drop(items_guard);
                    self.publish(Event::ItemChanged { id, item: item_after });
                    self.publish(Event::RunningIdsChanged { ids: running_ids });
                    return Ok(());
                }
            }
        }

        Err(RunQueueError::NotFound(id))
    }

    /// Delete `id`, which must be in a terminal status (§4.4.1).
    pub async fn delete(&self, id: ItemId) -> Result<(), RunQueueError> {
        {
            let mut items_guard = self.state.items.lock();
            let status = items_guard
                .items
                .get(&id)
                .map(|item| item.status)
                .ok_or(RunQueueError::NotFound(id))?;
            if !status.is_terminal() {
                return Err(RunQueueError::IllegalAction(id));
            }
            items_guard.items.remove(&id);
            items_guard.log_paths.remove(&id);
        }
        self.publish(Event::RunListChanged {
            items: util::items_snapshot_vec(&self.state),
        });
        Ok(())
    }

    /// Shift `id` by `delta` positions within `queue_order`, clamped to the
    /// valid range (§4.4.1).
    pub async fn move_relative(&self, id: ItemId, delta: i64) -> Result<(), RunQueueError> {
        let mut queue_guard = self.state.queue_order.lock();
        let pos = queue_guard
            .iter()
            .position(|&x| x == id)
            .ok_or(RunQueueError::NotFound(id))?;
        let new_pos = (pos as i64 + delta).clamp(0, queue_guard.len() as i64 - 1) as usize;
        util::reposition(&mut queue_guard, pos, new_pos);
        let queue_order = queue_guard.iter().copied().collect();
        drop(queue_guard);
        self.publish(Event::QueueChanged { queue_order });
        Ok(())
    }

    /// Move `id` to absolute index `pos` within `queue_order`, clamped to
    /// the valid range (§4.4.1).
    pub async fn move_to(&self, id: ItemId, pos: usize) -> Result<(), RunQueueError> {
        let mut queue_guard = self.state.queue_order.lock();
        let cur = queue_guard
            .iter()
            .position(|&x| x == id)
            .ok_or(RunQueueError::NotFound(id))?;
        let target = pos.min(queue_guard.len().saturating_sub(1));
        util::reposition(&mut queue_guard, cur, target);
        let queue_order = queue_guard.iter().copied().collect();
        drop(queue_guard);
        self.publish(Event::QueueChanged { queue_order });
        Ok(())
    }

    /// Validate `action` against [`legal_actions`] for `id`'s current
    /// status, then dispatch to the operation it names (§4.2, §4.4.1).
    pub async fn do_action(&self, id: ItemId, action: Action) -> Result<(), RunQueueError> {
        let (status, in_queue_order) = {
            let status = {
                let items_guard = self.state.items.lock();
                items_guard
                    .items
                    .get(&id)
                    .map(|item| item.status)
                    .ok_or(RunQueueError::NotFound(id))?
            };
            let in_queue_order = self.state.queue_order.lock().contains(&id);
            (status, in_queue_order)
        };

        if !legal_actions(status, in_queue_order).contains(&action) {
            return Err(RunQueueError::IllegalAction(id));
        }

        match action {
            Action::Delete => self.delete(id).await,
            Action::Cancel => self.cancel(id).await,
            Action::Stop => self.stop(id).await,
            Action::MoveUp => self.move_relative(id, -1).await,
            Action::MoveDown => self.move_relative(id, 1).await,
            Action::MoveTop => self.move_to(id, 0).await,
        }
    }

    /// Enable autoprocessing; the supervisor starts dispatching queued work
    /// on its next loop iteration (§4.4.1, §4.4.2).
    pub async fn start_autoprocessing(&self) -> Result<(), RunQueueError> {
        self.autoprocess.store(true, Ordering::SeqCst);
        self.publish(Event::AutoProcessingStateChanged { enabled: true });
        Ok(())
    }

    /// Disable autoprocessing. Already-running items are unaffected
    /// (§4.4.1).
    pub async fn stop_autoprocessing(&self) -> Result<(), RunQueueError> {
        self.autoprocess.store(false, Ordering::SeqCst);
        self.publish(Event::AutoProcessingStateChanged { enabled: false });
        Ok(())
    }

    /// Hard-stop every currently running item, recording `msg` as each
    /// item's `stderr` (§4.4.1).
    pub async fn force_stop_all_running(&self, msg: String) -> Result<(), RunQueueError> {
        let changed_items = {
            let mut items_guard = self.state.items.lock();
            let mut workers_guard = self.state.running_workers.lock();
            let ids: Vec<ItemId> = workers_guard.keys().copied().collect();
            let mut changed = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(handle) = workers_guard.remove(&id) {
                    handle.cancel.cancel();
                }
                if let Some(item) = items_guard.items.get_mut(&id) {
                    item.status = Status::Stopped;
                    item.stderr.clone_from(&msg);
                    item.dt_done = Some(self.now());
                    changed.push(item.clone());
                }
            }
            changed
        };

        for item in &changed_items {
            self.publish(Event::ItemChanged {
                id: item.id,
                item: item.clone(),
            });
        }
        self.publish(Event::RunningIdsChanged { ids: Vec::new() });
        Ok(())
    }

    /// Change the worker pool size. `-1` means unlimited; any other
    /// negative value is clamped to `-1` (§4.4.1).
    pub async fn set_pool_size(&self, n: i64) -> Result<(), RunQueueError> {
        let n = if n < -1 { -1 } else { n };
        self.pool_size.store(n, Ordering::SeqCst);
        Ok(())
    }

    /// Replace `id`'s configuration. Fails if `id` is currently running
    /// (§4.4.1: "configuration is firm" once a worker has started).
    pub async fn set_item_config(&self, id: ItemId, new_config: QueueItemConfig) -> Result<(), RunQueueError> {
        let item_after = {
            let mut items_guard = self.state.items.lock();
            let item = items_guard.items.get_mut(&id).ok_or(RunQueueError::NotFound(id))?;
            if item.status == Status::Running {
                return Err(RunQueueError::ConfigurationIsFirm(id));
            }
            item.config = new_config;
            item.clone()
        };
        self.publish(Event::ItemChanged { id, item: item_after });
        Ok(())
    }
}

#[cfg(test)]
#[path = "mutations_tests.rs"]
mod tests;
