// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event relay task (§4.5): subscribes to every engine event once, at
//! construction, and fans each one out to every currently authenticated
//! client as a `SignalEmit` frame encrypted under that client's own
//! session key.
//!
//! A send failure against one client (disconnect mid-relay) only evicts
//! that client; the relay loop continues for the rest (§4.5).

use std::sync::Arc;

use rq_core::ApiMessage;
use rq_transport::{frame, FrameType};
use tokio::sync::broadcast;
use tracing::debug;

use crate::clients::ClientRegistry;

pub(crate) async fn run(mut events: broadcast::Receiver<rq_core::Event>, clients: Arc<ClientRegistry>) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Closed) => return,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "relay lagged behind the engine's event channel");
                continue;
            }
        };

        let message = ApiMessage::SignalEmit { event };
        let Ok(body) = serde_json::to_vec(&message) else {
            continue;
        };

        for (id, session_key, writer) in clients.snapshot() {
            let mut writer = writer.lock().await;
            if frame::write_encrypted(&mut *writer, FrameType::Pickle, &body, &session_key)
                .await
                .is_err()
            {
                drop(writer);
                debug!(%id, "client disconnected during relay; evicting");
                clients.remove(id);
            }
        }
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
