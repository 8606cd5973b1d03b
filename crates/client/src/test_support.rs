// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only fixtures: a real [`rq_server::RunQueueServer`] backed by a
//! bare engine, for exercising [`crate::RunQueueProxy`] end to end.

use std::path::Path;
use std::sync::Arc;

use rq_core::QueueItemConfig;
use rq_engine::config::{EngineConfig, TargetError, WorkerContext};
use rq_engine::RunQueue;
use rq_server::{RunQueueServer, ServerConfig};

pub(crate) fn noop_target(_config: &QueueItemConfig, _ctx: &WorkerContext) -> Result<(), TargetError> {
    Ok(())
}

pub(crate) struct TestServer {
    pub(crate) server: Arc<RunQueueServer>,
    pub(crate) addr: String,
    pub(crate) password: String,
    _workspace: tempfile::TempDir,
    _log_dir: tempfile::TempDir,
}

/// Spins up a real server on an ephemeral loopback port and returns once
/// its accept loop is running.
pub(crate) async fn spawn_server(password: &str) -> TestServer {
    let workspace = tempfile::tempdir().unwrap();
    let log_dir = tempfile::tempdir().unwrap();

    let engine_config = EngineConfig {
        pool_size: -1,
        log_dir: log_dir.path().to_path_buf(),
        create_log_dir: true,
        target_function: Arc::new(noop_target),
    };
    let engine = Arc::new(RunQueue::new(engine_config).unwrap());
    engine.start();

    // port 0 lets the OS pick a free one; find it by binding ourselves
    // first, then handing the same port to the server.
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
        password: password.to_string(),
        workspace_dir: workspace.path().to_path_buf(),
    };
    let addr = config.bind_addr();
    let server = Arc::new(RunQueueServer::new(config, engine).unwrap());
    let serve_task = Arc::clone(&server);
    tokio::spawn(async move {
        let _ = serve_task.serve().await;
    });
    // Give the accept loop a moment to bind before a test tries to connect.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    TestServer {
        server,
        addr,
        password: password.to_string(),
        _workspace: workspace,
        _log_dir: log_dir,
    }
}
