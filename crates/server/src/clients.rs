// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The façade's table of authenticated clients (§4.5: `clients: Map<SocketId,
//! ClientData>`), each with its own session key for the event relay to
//! encrypt under.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rq_transport::SESSION_KEY_LEN;
use tokio::io::WriteHalf;
use tokio::net::TcpStream;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

pub type ClientId = Uuid;

/// What the façade keeps per authenticated client: its session key (for
/// the relay to encrypt outgoing `SignalEmit`s) and the write half of its
/// socket, serialized behind a lock since both the relay and that
/// client's own reply path write to it.
pub struct ClientData {
    pub session_key: [u8; SESSION_KEY_LEN],
    pub writer: Arc<AsyncMutex<WriteHalf<TcpStream>>>,
}

/// The façade's live client table, guarded by a single lock — contention
/// here is brief (insert/remove/snapshot only), never held across a
/// socket write.
#[derive(Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<ClientId, ClientData>>,
}

impl ClientRegistry {
    pub fn insert(&self, id: ClientId, data: ClientData) {
        self.clients.lock().insert(id, data);
    }

    pub fn remove(&self, id: ClientId) {
        self.clients.lock().remove(&id);
    }

    /// A snapshot of every client's id, session key, and writer handle —
    /// taken under the lock, then released before any socket I/O happens
    /// (§5: "emit-outside-lock").
    pub fn snapshot(&self) -> Vec<(ClientId, [u8; SESSION_KEY_LEN], Arc<AsyncMutex<WriteHalf<TcpStream>>>)> {
        self.clients
            .lock()
            .iter()
            .map(|(id, data)| (*id, data.session_key, Arc::clone(&data.writer)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
