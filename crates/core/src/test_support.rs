// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only builders, available to downstream crates under the
//! `test-support` feature so engine/storage/transport tests don't each
//! hand-roll a `QueueItem`.

use crate::clock::FakeClock;
use crate::id::ItemId;
use crate::item::{QueueItem, QueueItemConfig};
use crate::status::Status;

/// A fluent builder for [`QueueItem`] fixtures.
pub struct QueueItemBuilder {
    item: QueueItem,
}

impl QueueItemBuilder {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            item: QueueItem::new_queued(ItemId::new(id), name, QueueItemConfig::new(Vec::new()), 0),
        }
    }

    pub fn status(mut self, status: Status) -> Self {
        self.item.status = status;
        self
    }

    pub fn config(mut self, bytes: Vec<u8>) -> Self {
        self.item.config = QueueItemConfig::new(bytes);
        self
    }

    pub fn dt_added(mut self, dt: i64) -> Self {
        self.item.dt_added = dt;
        self
    }

    pub fn dt_started(mut self, dt: i64) -> Self {
        self.item.dt_started = Some(dt);
        self
    }

    pub fn dt_done(mut self, dt: i64) -> Self {
        self.item.dt_done = Some(dt);
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.item.exit_code = Some(code);
        self
    }

    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.item.stderr = stderr.into();
        self
    }

    pub fn build(self) -> QueueItem {
        self.item
    }
}

/// A [`FakeClock`] fixed at a convenient epoch for deterministic tests.
pub fn fixed_clock() -> FakeClock {
    FakeClock::at(1_700_000_000_000)
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
