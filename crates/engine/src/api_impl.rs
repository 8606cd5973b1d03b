// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`RunQueue`]'s native implementation of [`RunQueueApi`] (§4.7, §9).
//!
//! Every method here just forwards to the matching inherent method in
//! [`crate::mutations`]/[`crate::queries`] — this impl block exists so
//! `rq-server` can hold a `RunQueue` behind `Arc<dyn RunQueueApi>` the same
//! way it would hold a `rq-client::RunQueueProxy` in a test harness.

use std::collections::HashMap;

use async_trait::async_trait;
use rq_core::{
    Action, CommandLineInfo, CommandLineOutput, ItemId, QueueItem, QueueItemConfig, RunQueueApi, RunQueueError,
};

use crate::RunQueue;

#[async_trait]
impl RunQueueApi for RunQueue {
    async fn add(&self, name: String, config: QueueItemConfig) -> Result<ItemId, RunQueueError> {
        RunQueue::add(self, name, config).await
    }

    async fn cancel(&self, id: ItemId) -> Result<(), RunQueueError> {
        RunQueue::cancel(self, id).await
    }

    async fn stop(&self, id: ItemId) -> Result<(), RunQueueError> {
        RunQueue::stop(self, id).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), RunQueueError> {
        RunQueue::delete(self, id).await
    }

    async fn move_relative(&self, id: ItemId, delta: i64) -> Result<(), RunQueueError> {
        RunQueue::move_relative(self, id, delta).await
    }

    async fn move_to(&self, id: ItemId, pos: usize) -> Result<(), RunQueueError> {
        RunQueue::move_to(self, id, pos).await
    }

    async fn do_action(&self, id: ItemId, action: Action) -> Result<(), RunQueueError> {
        RunQueue::do_action(self, id, action).await
    }

    async fn start_autoprocessing(&self) -> Result<(), RunQueueError> {
        RunQueue::start_autoprocessing(self).await
    }

    async fn stop_autoprocessing(&self) -> Result<(), RunQueueError> {
        RunQueue::stop_autoprocessing(self).await
    }

    async fn force_stop_all_running(&self, msg: String) -> Result<(), RunQueueError> {
        RunQueue::force_stop_all_running(self, msg).await
    }

    async fn set_pool_size(&self, n: i64) -> Result<(), RunQueueError> {
        RunQueue::set_pool_size(self, n).await
    }

    async fn queue_snapshot(&self) -> Result<Vec<ItemId>, RunQueueError> {
        RunQueue::queue_snapshot(self).await
    }

    async fn items_snapshot(&self) -> Result<HashMap<ItemId, QueueItem>, RunQueueError> {
        RunQueue::items_snapshot(self).await
    }

    async fn command_line_info(&self) -> Result<HashMap<ItemId, CommandLineInfo>, RunQueueError> {
        RunQueue::command_line_info(self).await
    }

    async fn command_line_output(
        &self,
        id: ItemId,
        seek_end: i64,
        max_bytes: i64,
    ) -> Result<CommandLineOutput, RunQueueError> {
        RunQueue::command_line_output(self, id, seek_end, max_bytes).await
    }

    async fn get_item_config(&self, id: ItemId) -> Result<QueueItemConfig, RunQueueError> {
        RunQueue::get_item_config(self, id).await
    }

    async fn set_item_config(&self, id: ItemId, new_config: QueueItemConfig) -> Result<(), RunQueueError> {
        RunQueue::set_item_config(self, id, new_config).await
    }
}

#[cfg(test)]
#[path = "api_impl_tests.rs"]
mod tests;
