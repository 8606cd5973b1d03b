//! Shared fixtures for the end-to-end scenarios in §8: a handful of
//! canned target functions and a helper for picking a matching event out
//! of a live subscription, tolerant of the ticker's periodic
//! `RunListChanged`/`QueueChanged` re-publishes interleaving with the
//! ones a scenario cares about.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rq_core::Event;
use rq_engine::config::{EngineConfig, TargetError, TargetFunction, WorkerContext};
use rq_engine::RunQueue;
use rq_core::QueueItemConfig;
use tokio::sync::broadcast;

pub const SPEC_WAIT: Duration = Duration::from_secs(5);

pub fn ok_target(_config: &QueueItemConfig, _ctx: &WorkerContext) -> Result<(), TargetError> {
    Ok(())
}

pub fn failing_target(_config: &QueueItemConfig, _ctx: &WorkerContext) -> Result<(), TargetError> {
    Err(TargetError::new("ValueError", "boom"))
}

/// Runs until cancelled, polling roughly every 25ms so a `Stop` is
/// noticed quickly without busy-spinning.
pub fn sleepy_target(_config: &QueueItemConfig, ctx: &WorkerContext) -> Result<(), TargetError> {
    for _ in 0..400 {
        if ctx.is_cancelled() {
            return Err(TargetError::new("Cancelled", "stopped by request"));
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    Ok(())
}

pub fn engine_with(dir: &Path, pool_size: i64, target: impl TargetFunction + 'static) -> Arc<RunQueue> {
    let config = EngineConfig {
        pool_size,
        log_dir: dir.to_path_buf(),
        create_log_dir: true,
        target_function: Arc::new(target),
    };
    Arc::new(RunQueue::new(config).expect("temp log dir is writable"))
}

/// Receives events off `rx` until one matches `pred`, ignoring any that
/// don't — the ticker (§4.4.3) periodically republishes full snapshots
/// independent of whatever mutation a scenario is driving.
pub async fn expect_next(rx: &mut broadcast::Receiver<Event>, timeout: Duration, pred: impl Fn(&Event) -> bool) -> Event {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        assert!(remaining > Duration::ZERO, "timed out waiting for a matching event");
        let event = tokio::time::timeout(remaining, rx.recv())
            .await
            .expect("timed out waiting for a matching event")
            .expect("event channel closed early");
        if pred(&event) {
            return event;
        }
    }
}
