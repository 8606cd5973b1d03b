// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only fixtures shared across this crate's own test modules: a bare
//! engine wired to a temp log directory, and a matching [`ServerConfig`].

use std::path::Path;
use std::sync::Arc;

use rq_core::{QueueItemConfig, RunQueueApi};
use rq_engine::config::{EngineConfig, TargetError, WorkerContext};
use rq_engine::RunQueue;

use crate::config::ServerConfig;

pub(crate) fn noop_target(_config: &QueueItemConfig, _ctx: &WorkerContext) -> Result<(), TargetError> {
    Ok(())
}

/// A freshly constructed engine backed by a temp log directory.
pub(crate) fn test_engine_concrete(dir: &Path) -> Arc<RunQueue> {
    let config = EngineConfig {
        pool_size: -1,
        log_dir: dir.to_path_buf(),
        create_log_dir: true,
        target_function: Arc::new(noop_target),
    };
    Arc::new(RunQueue::new(config).expect("temp log dir is writable"))
}

/// The same fixture, wrapped as the trait object `rq-server`'s dispatcher
/// actually talks to.
pub(crate) fn test_engine(dir: &Path) -> Arc<dyn RunQueueApi> {
    test_engine_concrete(dir) as Arc<dyn RunQueueApi>
}

pub(crate) fn test_config(workspace: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        password: "correct-horse".to_string(),
        workspace_dir: workspace.to_path_buf(),
    }
}
