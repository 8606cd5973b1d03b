// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drains the log-event channel every worker's [`crate::log_capture::LogCapture`]
//! feeds into and republishes each record as `NewCommandLineOutput`
//! (§4.4.4). No ordering is guaranteed between log records from different
//! concurrently running items (§4.4.4).

use std::sync::Arc;

use rq_core::{Event, LogRecord};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::RunQueue;

pub(crate) async fn run(engine: Arc<RunQueue>, mut log_rx: UnboundedReceiver<LogRecord>) {
    while let Some(record) = log_rx.recv().await {
        engine.publish(Event::NewCommandLineOutput { record });
    }
}

#[cfg(test)]
#[path = "log_relay_tests.rs"]
mod tests;
