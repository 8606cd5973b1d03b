// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only fixtures: a few canned `TargetFunction`s and a helper that
//! wires up a [`RunQueue`] against a temp log directory with a
//! [`FakeClock`], so every test module in this crate doesn't hand-roll one.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rq_core::clock::{Clock, FakeClock};
use rq_core::QueueItemConfig;

use crate::config::{EngineConfig, TargetError, WorkerContext};
use crate::RunQueue;

pub(crate) fn noop_target(_config: &QueueItemConfig, _ctx: &WorkerContext) -> Result<(), TargetError> {
    Ok(())
}

pub(crate) fn failing_target(_config: &QueueItemConfig, ctx: &WorkerContext) -> Result<(), TargetError> {
    ctx.log("about to fail");
    Err(TargetError::new("ValueError", "boom"))
}

pub(crate) fn panicking_target(_config: &QueueItemConfig, _ctx: &WorkerContext) -> Result<(), TargetError> {
    panic!("kaboom");
}

/// Runs until cancelled — used to exercise `stop`/`force_stop_all_running`
/// against an item that is genuinely running.
pub(crate) fn blocking_target(_config: &QueueItemConfig, ctx: &WorkerContext) -> Result<(), TargetError> {
    while !ctx.is_cancelled() {
        std::thread::sleep(Duration::from_millis(5));
    }
    Ok(())
}

pub(crate) fn test_engine(
    dir: &Path,
    target: impl Fn(&QueueItemConfig, &WorkerContext) -> Result<(), TargetError> + Send + Sync + 'static,
) -> (Arc<RunQueue>, Arc<FakeClock>) {
    let clock = Arc::new(FakeClock::at(1_700_000_000_000));
    let config = EngineConfig {
        pool_size: -1,
        log_dir: dir.to_path_buf(),
        create_log_dir: true,
        target_function: Arc::new(target),
    };
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let engine = Arc::new(RunQueue::with_clock(config, dyn_clock).expect("temp log dir is writable"));
    (engine, clock)
}
