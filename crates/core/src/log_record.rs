// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-emission tuple pushed onto the engine's log event channel.

use crate::id::ItemId;
use serde::{Deserialize, Serialize};

/// One formatted line appended to an item's log file, carried on the log
/// event channel alongside enough context for a listener to find it again
/// (§3, §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub item_id: ItemId,
    pub item_name: String,
    pub file_path: String,
    pub timestamp: i64,
    /// Byte offset into `file_path` immediately before this record was
    /// appended, so a tailing reader can seek straight to new content.
    pub file_offset_before_write: u64,
    pub formatted_message: String,
}

impl LogRecord {
    pub fn new(
        item_id: ItemId,
        item_name: impl Into<String>,
        file_path: impl Into<String>,
        timestamp: i64,
        file_offset_before_write: u64,
        formatted_message: impl Into<String>,
    ) -> Self {
        Self {
            item_id,
            item_name: item_name.into(),
            file_path: file_path.into(),
            timestamp,
            file_offset_before_write,
            formatted_message: formatted_message.into(),
        }
    }
}

#[cfg(test)]
#[path = "log_record_tests.rs"]
mod tests;
