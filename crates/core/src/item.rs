// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The queue item record and its opaque configuration payload.

use crate::id::ItemId;
use crate::status::Status;
use serde::{Deserialize, Serialize};

/// An opaque, engine-unintepreted configuration payload.
///
/// Modeled as a serialized byte blob rather than a generic type parameter
/// (§3: "configuration dataclass introspection... out of scope"). The
/// engine moves it around, persists it, and hands it to `target_function`
/// without ever looking inside.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItemConfig(pub Vec<u8>);

impl QueueItemConfig {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A single entry in the RunQueue engine's item table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: ItemId,
    pub name: String,
    pub config: QueueItemConfig,
    pub status: Status,
    pub dt_added: i64,
    pub dt_started: Option<i64>,
    pub dt_done: Option<i64>,
    pub exit_code: Option<i32>,
    /// Short failure summary, e.g. `"ValueError:boom"`. Empty until set.
    pub stderr: String,
}

impl QueueItem {
    /// Construct a freshly `Queued` item, as `add` does (§4.4.1).
    pub fn new_queued(id: ItemId, name: impl Into<String>, config: QueueItemConfig, dt_added: i64) -> Self {
        Self {
            id,
            name: name.into(),
            config,
            status: Status::Queued,
            dt_added,
            dt_started: None,
            dt_done: None,
            exit_code: None,
            stderr: String::new(),
        }
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
