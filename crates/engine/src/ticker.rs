// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reconciliation ticker: a coarse periodic re-emission of full
//! `RunListChanged`/`QueueChanged` snapshots, so a subscriber that missed
//! events (a slow consumer falling behind the broadcast channel's
//! capacity) converges on correct state within one tick (§4.4.3, §4.7).

use std::sync::Arc;
use std::time::Duration;

use rq_core::Event;

use crate::util;
use crate::RunQueue;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) async fn run(engine: Arc<RunQueue>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    // The first tick fires immediately; nothing useful to reconcile yet.
    interval.tick().await;

    loop {
        interval.tick().await;
        if engine.is_shutting_down() && engine.state.running_workers.lock().is_empty() {
            return;
        }
        engine.publish(Event::RunListChanged {
            items: util::items_snapshot_vec(&engine.state),
        });
        engine.publish(Event::QueueChanged {
            queue_order: util::queue_order_snapshot(&engine.state),
        });
    }
}

#[cfg(test)]
#[path = "ticker_tests.rs"]
mod tests;
