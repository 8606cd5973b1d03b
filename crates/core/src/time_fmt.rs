// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamp formatting shared by log records and persistence.

use chrono::{DateTime, Utc};

/// Render an epoch-millisecond timestamp as `YYYY-MM-DD HH:MM:SS.mmm`
/// (UTC), the format used in per-item log lines (§4.3).
pub fn format_epoch_ms(epoch_ms: i64) -> String {
    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(epoch_ms).unwrap_or(DateTime::UNIX_EPOCH);
    dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
