// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only fixture: a real [`rq_engine::RunQueue`] wired to
//! [`crate::target::ShellTarget`], for exercising the shell target
//! end to end rather than through `rq-engine`'s private `WorkerContext`
//! construction.

use std::sync::Arc;
use std::time::Duration;

use rq_core::{ItemId, RunQueueApi, Status};
use rq_engine::config::EngineConfig;
use rq_engine::RunQueue;

use crate::target::ShellTarget;

pub(crate) async fn spawn_engine() -> (Arc<RunQueue>, tempfile::TempDir) {
    let log_dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        pool_size: -1,
        log_dir: log_dir.path().to_path_buf(),
        create_log_dir: true,
        target_function: Arc::new(ShellTarget),
    };
    let engine = Arc::new(RunQueue::new(config).unwrap());
    engine.start();
    engine.start_autoprocessing().await.unwrap();
    (engine, log_dir)
}

/// Polls `items_snapshot` until `id` reaches a terminal status or the
/// deadline elapses.
pub(crate) async fn wait_for_terminal(engine: &RunQueue, id: ItemId) -> Status {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        let items = engine.items_snapshot().await.unwrap();
        let status = items[&id].status;
        if status.is_terminal() {
            return status;
        }
        if std::time::Instant::now() > deadline {
            panic!("item {id} never reached a terminal status, last seen {status:?}");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

pub(crate) async fn wait_until_running(engine: &RunQueue, id: ItemId) {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        let items = engine.items_snapshot().await.unwrap();
        if items[&id].status == Status::Running {
            return;
        }
        if std::time::Instant::now() > deadline {
            panic!("item {id} never started running");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
