// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events the engine emits, relayed verbatim by the façade to every
//! authenticated client (§4.7).

use crate::id::ItemId;
use crate::item::QueueItem;
use crate::log_record::LogRecord;
use serde::{Deserialize, Serialize};

/// An engine event, fanned out over a `tokio::sync::broadcast` channel to
/// local subscribers and, when serving remotely, relayed by the façade to
/// every client (which re-emits it locally, see `rq-client`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "queue:changed")]
    QueueChanged { queue_order: Vec<ItemId> },

    #[serde(rename = "run_list:changed")]
    RunListChanged { items: Vec<QueueItem> },

    #[serde(rename = "item:changed")]
    ItemChanged { id: ItemId, item: QueueItem },

    #[serde(rename = "auto_processing:state_changed")]
    AutoProcessingStateChanged { enabled: bool },

    #[serde(rename = "console_output:new_path")]
    NewConsoleOutputPath {
        id: ItemId,
        name: String,
        path: String,
    },

    #[serde(rename = "command_line:new_output")]
    NewCommandLineOutput { record: LogRecord },

    #[serde(rename = "running_ids:changed")]
    RunningIdsChanged { ids: Vec<ItemId> },

    #[serde(rename = "reset:triggered")]
    ResetTriggered,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
