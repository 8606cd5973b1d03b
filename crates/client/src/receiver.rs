// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The proxy's single inbound-frame consumer (§4.6): reads every frame
//! the server sends on this connection and either resolves a pending
//! call (`MethodReturn`), re-emits an event locally (`SignalEmit`), or
//! logs it (`State`). Runs until the connection closes or errors, at
//! which point every still-pending call is failed so no caller hangs
//! forever.

use std::sync::Arc;

use rq_core::{ApiMessage, Event};
use rq_transport::{frame, FrameType, TransportError, SESSION_KEY_LEN};
use tokio::io::ReadHalf;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::pending::PendingCalls;

pub(crate) async fn run(
    mut reader: ReadHalf<TcpStream>,
    session_key: [u8; SESSION_KEY_LEN],
    pending: Arc<PendingCalls>,
    events_tx: broadcast::Sender<Event>,
) {
    loop {
        let frame = match frame::read_frame(&mut reader, Some(&session_key)).await {
            Ok(frame) => frame,
            Err(TransportError::ConnectionClosed) => {
                debug!("server closed the connection");
                break;
            }
            Err(err) => {
                warn!(%err, "transport error reading from server; disconnecting");
                break;
            }
        };

        match frame.frame_type {
            FrameType::State => {
                debug!("received State frame from server");
            }
            FrameType::Pickle => {
                let message: ApiMessage = match serde_json::from_slice(&frame.body) {
                    Ok(m) => m,
                    Err(err) => {
                        warn!(%err, "malformed Pickle frame from server; disconnecting");
                        break;
                    }
                };
                match message {
                    ApiMessage::MethodReturn { call_id, result } => pending.resolve(call_id, result),
                    ApiMessage::SignalEmit { event } => {
                        let _ = events_tx.send(event);
                    }
                    ApiMessage::MethodCall { .. } => {
                        warn!("server sent a client-only message variant; disconnecting");
                        break;
                    }
                }
            }
            other => {
                warn!(?other, "unexpected frame type from server; disconnecting");
                break;
            }
        }
    }

    pending.fail_all("connection to server closed");
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
