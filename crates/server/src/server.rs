// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The server façade (§4.5): binds a stream socket, authenticates
//! connections, dispatches forwarded method calls onto the engine, and
//! relays engine events back to every authenticated client.

use std::io;
use std::sync::Arc;

use rq_core::RunQueueApi;
use rq_engine::RunQueue;
use rq_storage::WorkspaceLock;
use rq_transport::TransportError;
use tokio::io::split;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::clients::{ClientData, ClientRegistry};
use crate::config::ServerConfig;
use crate::{auth, listener, relay};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Storage(#[from] rq_storage::StorageError),

    #[error(transparent)]
    Persist(#[from] rq_engine::persistence::PersistError),
}

/// The RunQueue server façade: a bound engine plus the client table and
/// shutdown signal the accept loop and relay task share.
pub struct RunQueueServer {
    config: ServerConfig,
    engine: Arc<RunQueue>,
    clients: Arc<ClientRegistry>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    _workspace_lock: WorkspaceLock,
}

impl RunQueueServer {
    /// Acquire the workspace lock and wrap `engine` in a façade ready to
    /// [`Self::serve`]. Fails [`rq_storage::StorageError::WorkspaceInUse`]
    /// if another engine already holds the workspace (§4.4.7).
    pub fn new(config: ServerConfig, engine: Arc<RunQueue>) -> Result<Self, ServerError> {
        let lock = WorkspaceLock::acquire(&config.workspace_dir)?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            engine,
            clients: Arc::new(ClientRegistry::default()),
            shutdown_tx,
            shutdown_rx,
            _workspace_lock: lock,
        })
    }

    /// Bind the listen socket and accept connections until [`Self::shutdown`]
    /// is called (§4.5).
    pub async fn serve(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        info!(addr = %self.config.bind_addr(), "RunQueue server listening");

        let api: Arc<dyn RunQueueApi> = Arc::clone(&self.engine) as Arc<dyn RunQueueApi>;
        let relay_task = tokio::spawn(relay::run(self.engine.subscribe(), Arc::clone(&self.clients)));

        let mut shutdown_rx = self.shutdown_rx.clone();
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            let password = self.config.password.clone();
                            let engine = Arc::clone(&api);
                            let clients = Arc::clone(&self.clients);
                            let client_shutdown = self.shutdown_rx.clone();
                            tokio::spawn(async move {
                                handle_connection(stream, addr.to_string(), password, engine, clients, client_shutdown).await;
                            });
                        }
                        Err(err) => error!(%err, "accept failed"),
                    }
                }
            }
        }

        relay_task.abort();
        Ok(())
    }

    /// Run the shutdown sequence (§4.5): stop autoprocessing, snapshot the
    /// workspace with running items rewritten to `Stopped`, then signal
    /// every listener task and the accept loop to stop. The caller decides
    /// beforehand whether it is acceptable to proceed while workers are
    /// still running (§4.5: "ask the operator... is the caller's
    /// concern").
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        self.engine.stop_autoprocessing().await.ok();
        let snapshot_path = self.config.workspace_dir.join(rq_storage::SNAPSHOT_FILE_NAME);
        self.engine.save_to(&snapshot_path, true).await?;
        self.shutdown_tx.send_replace(true);
        Ok(())
    }

    pub fn connected_client_count(&self) -> usize {
        self.clients.len()
    }
}

async fn handle_connection(
    stream: tokio::net::TcpStream,
    peer: String,
    password: String,
    engine: Arc<dyn RunQueueApi>,
    clients: Arc<ClientRegistry>,
    shutdown: watch::Receiver<bool>,
) {
    let mut stream = stream;
    let authed = match auth::authenticate(&mut stream, &password).await {
        Ok(a) => a,
        Err(TransportError::AuthenticationError(reason)) => {
            warn!(%peer, %reason, "authentication failed");
            return;
        }
        Err(err) => {
            warn!(%peer, %err, "transport error during handshake");
            return;
        }
    };

    let (reader, writer) = split(stream);
    let writer = Arc::new(tokio::sync::Mutex::new(writer));
    let id = Uuid::new_v4();
    clients.insert(
        id,
        ClientData {
            session_key: authed.session_key,
            writer: Arc::clone(&writer),
        },
    );
    info!(%peer, client_id = %id, "client authenticated");

    listener::run(reader, writer, authed.session_key, engine, shutdown).await;
    clients.remove(id);
    info!(%peer, client_id = %id, "client disconnected");
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
