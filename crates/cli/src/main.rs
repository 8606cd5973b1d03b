// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! runqueue - the RunQueue CLI
//!
//! Wires `rq-engine`, `rq-server`, and `rq-client` together for local use
//! and smoke-testing (§1): `serve` runs an engine behind a server façade
//! in this process; every other subcommand is a thin `rq-client` call
//! against a `serve` instance running somewhere (possibly this same
//! host).

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod target;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rq_client::{ClientConfig, RunQueueProxy};
use rq_core::time_fmt::format_epoch_ms;
use rq_core::{Action, QueueItemConfig, RunQueueApi};
use rq_engine::config::EngineConfig;
use rq_engine::RunQueue;
use rq_server::{RunQueueServer, ServerConfig};
use tracing::info;

use crate::target::ShellTarget;

#[derive(Parser)]
#[command(name = "runqueue", version, about = "RunQueue - a networked job queue service")]
struct Cli {
    /// Host to bind for `serve`, or to connect to for every other
    /// subcommand. Defaults to `0.0.0.0` for `serve` and to the local
    /// host name (falling back to `127.0.0.1`) for a client connection.
    #[arg(long, global = true)]
    host: Option<String>,

    /// Server port to connect to, or to bind for `serve`
    #[arg(long, global = true, default_value_t = rq_transport::DEFAULT_PORT)]
    port: u16,

    /// Shared secret, also read from RUNQUEUE_PASSWORD
    #[arg(long, global = true, env = "RUNQUEUE_PASSWORD", default_value = "")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an engine and server façade in this process
    Serve {
        /// Directory holding the workspace lock and persistence snapshot
        #[arg(long, default_value = "./runqueue-workspace")]
        workspace: PathBuf,
        /// Directory holding per-item log files
        #[arg(long)]
        log_dir: Option<PathBuf>,
        /// Worker pool size; -1 means unlimited
        #[arg(long, default_value_t = -1)]
        pool_size: i64,
    },
    /// Queue a new item, given its config as a shell command line
    Add {
        name: String,
        /// Shell command line run by the default target function
        command_line: String,
    },
    /// List every item and its status
    List,
    /// Cancel a queued item
    Cancel { id: u64 },
    /// Stop a running item
    Stop { id: u64 },
    /// Delete a terminal item
    Delete { id: u64 },
    /// Move a queued item: up, down, or top
    Move {
        id: u64,
        #[arg(value_enum)]
        direction: MoveDirection,
    },
    /// Resume autoprocessing (pop queued items onto free workers)
    StartAutoprocessing,
    /// Pause autoprocessing
    StopAutoprocessing,
    /// Stop every running item immediately
    ForceStopAll {
        #[arg(default_value = "stopped by operator")]
        message: String,
    },
    /// Change the worker pool size; -1 means unlimited
    SetPoolSize { n: i64 },
    /// Print an item's captured console output
    Logs {
        id: u64,
        /// Byte offset from the end of the file to start from; 0 means from the start
        #[arg(long, default_value_t = 0)]
        seek_end: i64,
        /// Maximum bytes to read
        #[arg(long, default_value_t = 65536)]
        max_bytes: i64,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum MoveDirection {
    Up,
    Down,
    Top,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            workspace,
            log_dir,
            pool_size,
        } => {
            let host = cli.host.unwrap_or_else(|| "0.0.0.0".to_string());
            serve(host, cli.port, cli.password, workspace, log_dir, pool_size).await
        }
        other => {
            let host = cli.host.unwrap_or_else(local_host_name);
            run_client_command(host, cli.port, cli.password, other).await
        }
    }
}

/// The local machine's host name, for a client's default `--host`, falling
/// back to the loopback address if it can't be determined (§6).
fn local_host_name() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}

async fn serve(
    host: String,
    port: u16,
    password: String,
    workspace: PathBuf,
    log_dir: Option<PathBuf>,
    pool_size: i64,
) -> Result<()> {
    let log_dir = log_dir.unwrap_or_else(|| workspace.join(rq_storage::LOGS_DIR_NAME));
    std::fs::create_dir_all(&workspace).context("creating workspace directory")?;

    let engine_config = EngineConfig {
        pool_size,
        log_dir,
        create_log_dir: true,
        target_function: Arc::new(ShellTarget),
    };
    let engine = Arc::new(RunQueue::new(engine_config).context("constructing engine")?);

    let snapshot_path = workspace.join(rq_storage::SNAPSHOT_FILE_NAME);
    if engine
        .load_from_path(&snapshot_path)
        .await
        .context("loading persisted snapshot")?
    {
        info!(path = %snapshot_path.display(), "restored persisted snapshot");
    }
    engine.start();

    let server_config = ServerConfig {
        host,
        port,
        password,
        workspace_dir: workspace,
    };
    let bind_addr = server_config.bind_addr();
    let server = Arc::new(RunQueueServer::new(server_config, Arc::clone(&engine)).context("binding workspace lock")?);

    info!(addr = %bind_addr, "runqueue serving");

    let serve_server = Arc::clone(&server);
    let serve_task = tokio::spawn(async move { serve_server.serve().await });

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!("shutdown requested");
    server.shutdown().await.context("shutting down")?;
    serve_task.await.context("server task panicked")??;
    Ok(())
}

async fn run_client_command(host: String, port: u16, password: String, command: Commands) -> Result<()> {
    let config = ClientConfig { host, port, password };
    let proxy = RunQueueProxy::new();
    proxy.connect(&config).await.context("connecting to runqueue server")?;

    match command {
        Commands::Serve { .. } => unreachable!("handled in main"),
        Commands::Add { name, command_line } => {
            let id = proxy.add(name, QueueItemConfig::new(command_line.into_bytes())).await?;
            println!("{id}");
        }
        Commands::List => {
            let order = proxy.queue_snapshot().await?;
            let items = proxy.items_snapshot().await?;
            println!("{:<6} {:<10} {:<8} {:<24} NAME", "ID", "STATUS", "QUEUED", "ADDED");
            let mut ids: Vec<_> = items.keys().copied().collect();
            ids.sort();
            for id in ids {
                let item = &items[&id];
                println!(
                    "{:<6} {:<10?} {:<8} {:<24} {}",
                    item.id,
                    item.status,
                    order.contains(&item.id),
                    format_epoch_ms(item.dt_added),
                    item.name
                );
            }
        }
        Commands::Cancel { id } => proxy.do_action(id.into(), Action::Cancel).await?,
        Commands::Stop { id } => proxy.do_action(id.into(), Action::Stop).await?,
        Commands::Delete { id } => proxy.do_action(id.into(), Action::Delete).await?,
        Commands::Move { id, direction } => {
            let action = match direction {
                MoveDirection::Up => Action::MoveUp,
                MoveDirection::Down => Action::MoveDown,
                MoveDirection::Top => Action::MoveTop,
            };
            proxy.do_action(id.into(), action).await?
        }
        Commands::StartAutoprocessing => proxy.start_autoprocessing().await?,
        Commands::StopAutoprocessing => proxy.stop_autoprocessing().await?,
        Commands::ForceStopAll { message } => proxy.force_stop_all_running(message).await?,
        Commands::SetPoolSize { n } => proxy.set_pool_size(n).await?,
        Commands::Logs { id, seek_end, max_bytes } => {
            let output = proxy.command_line_output(id.into(), seek_end, max_bytes).await?;
            print!("{}", output.text);
        }
    }

    proxy.disconnect().await;
    Ok(())
}
