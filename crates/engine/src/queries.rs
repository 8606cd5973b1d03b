// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's read-only operations (§4.4.5). No event is published by
//! anything in this module — snapshots only reflect state as of the
//! instant they were taken.

use std::collections::HashMap;

use rq_core::{CommandLineInfo, CommandLineOutput, ItemId, QueueItem, QueueItemConfig, RunQueueError};

use crate::RunQueue;

impl RunQueue {
    pub async fn queue_snapshot(&self) -> Result<Vec<ItemId>, RunQueueError> {
        Ok(self.state.queue_order.lock().iter().copied().collect())
    }

    pub async fn items_snapshot(&self) -> Result<HashMap<ItemId, QueueItem>, RunQueueError> {
        Ok(self.state.items.lock().items.clone())
    }

    /// Per-item console metadata: display name, log file path, current file
    /// size, and whether a worker is currently attached (§4.4.5).
    pub async fn command_line_info(&self) -> Result<HashMap<ItemId, CommandLineInfo>, RunQueueError> {
        let items_guard = self.state.items.lock();
        let running_ids: std::collections::HashSet<ItemId> =
            self.state.running_workers.lock().keys().copied().collect();

        let mut out = HashMap::with_capacity(items_guard.log_paths.len());
        for (id, (name, path)) in items_guard.log_paths.iter() {
            let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            out.insert(
                *id,
                CommandLineInfo {
                    name: name.clone(),
                    path: path.clone(),
                    file_size,
                    is_running: running_ids.contains(id),
                },
            );
        }
        Ok(out)
    }

    /// Read `id`'s log file directly (§4.4.5). `seek_end` negative reads
    /// from the start of the file; non-negative reads only the trailing
    /// `seek_end` bytes. `max_bytes` negative returns everything from that
    /// starting point; non-negative caps the number of bytes returned.
    ///
    /// Reads the file directly with no coordination with an actively
    /// writing worker (§4.4.5: "a partial trailing line is acceptable").
    pub async fn command_line_output(
        &self,
        id: ItemId,
        seek_end: i64,
        max_bytes: i64,
    ) -> Result<CommandLineOutput, RunQueueError> {
        let path = {
            let items_guard = self.state.items.lock();
            items_guard
                .log_paths
                .get(&id)
                .map(|(_, path)| path.clone())
                .ok_or(RunQueueError::NotFound(id))?
        };

        let data = std::fs::read(&path).unwrap_or_default();
        let file_len = data.len() as u64;
        let start = if seek_end < 0 {
            0
        } else {
            file_len.saturating_sub(seek_end as u64)
        };
        let end = if max_bytes < 0 {
            file_len
        } else {
            file_len.min(start.saturating_add(max_bytes as u64))
        };
        let slice = &data[start as usize..end as usize];
        let text = String::from_utf8_lossy(slice).into_owned();

        let last_modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        Ok(CommandLineOutput { text, last_modified })
    }

    pub async fn get_item_config(&self, id: ItemId) -> Result<QueueItemConfig, RunQueueError> {
        let items_guard = self.state.items.lock();
        items_guard
            .items
            .get(&id)
            .map(|item| item.config.clone())
            .ok_or(RunQueueError::NotFound(id))
    }
}

#[cfg(test)]
#[path = "queries_tests.rs"]
mod tests;
