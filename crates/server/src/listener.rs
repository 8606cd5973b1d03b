// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-client listener task run after authentication succeeds (§4.5).
//!
//! Reads frames in a loop with the transport's shutdown-friendly receive
//! timeout; `State` frames are logged only, `Pickle` frames are dispatched
//! as API calls, and a client-originated `SignalEmit`/`MethodReturn` is a
//! protocol violation (§4.5: "Never allow a client-originated `SignalEmit`
//! or `MethodReturn`").

use std::sync::Arc;

use rq_core::{ApiMessage, RunQueueApi};
use rq_transport::{frame, FrameType, StateBody, StateKind, TransportError, DEFAULT_FRAME_TIMEOUT, SESSION_KEY_LEN};
use tokio::io::{AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use crate::dispatch;

/// Run the listener loop for one authenticated client until the socket
/// closes, the frame is malformed, or `shutdown` fires.
///
/// Returns when the connection ends for any reason; the caller (the
/// accept loop) is responsible for evicting the client from the registry
/// (§4.5: "A client disconnect during relay is logged; the client is
/// evicted").
pub(crate) async fn run(
    mut reader: ReadHalf<TcpStream>,
    writer: Arc<AsyncMutex<WriteHalf<TcpStream>>>,
    session_key: [u8; SESSION_KEY_LEN],
    engine: Arc<dyn RunQueueApi>,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    loop {
        let frame_result = tokio::select! {
            biased;
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    debug!("listener shutting down");
                    return;
                }
                continue;
            }
            result = tokio::time::timeout(DEFAULT_FRAME_TIMEOUT, frame::read_frame(&mut reader, Some(&session_key))) => {
                match result {
                    Ok(inner) => inner,
                    Err(_elapsed) => continue, // timeout: loop back to re-check shutdown
                }
            }
        };

        let frame = match frame_result {
            Ok(frame) => frame,
            Err(TransportError::ConnectionClosed) => {
                debug!("client disconnected");
                return;
            }
            Err(err) => {
                warn!(%err, "transport error on client connection; closing");
                return;
            }
        };

        match frame.frame_type {
            FrameType::State => {
                debug!("received State frame from client");
            }
            FrameType::Pickle => {
                let message: ApiMessage = match serde_json::from_slice(&frame.body) {
                    Ok(m) => m,
                    Err(err) => {
                        warn!(%err, "malformed Pickle frame from client; closing");
                        return;
                    }
                };
                match message {
                    ApiMessage::MethodCall { call_id, method, args } => {
                        let result = dispatch::dispatch(&engine, &method, args).await;
                        let reply = ApiMessage::MethodReturn { call_id, result };
                        if send_pickle(&writer, &reply, &session_key).await.is_err() {
                            return;
                        }
                    }
                    ApiMessage::SignalEmit { .. } | ApiMessage::MethodReturn { .. } => {
                        warn!("client sent a server-only message variant; closing");
                        send_error(&writer, "clients may only send MethodCall", &session_key).await;
                        return;
                    }
                }
            }
            other => {
                warn!(?other, "unexpected frame type from authenticated client; closing");
                return;
            }
        }
    }
}

async fn send_pickle(
    writer: &Arc<AsyncMutex<WriteHalf<TcpStream>>>,
    message: &ApiMessage,
    session_key: &[u8; SESSION_KEY_LEN],
) -> Result<(), TransportError> {
    let body = serde_json::to_vec(message)?;
    let mut writer = writer.lock().await;
    frame::write_encrypted(&mut *writer, FrameType::Pickle, &body, session_key).await
}

async fn send_error(writer: &Arc<AsyncMutex<WriteHalf<TcpStream>>>, message: &str, session_key: &[u8; SESSION_KEY_LEN]) {
    if let Ok(body) = serde_json::to_vec(&StateBody {
        kind: StateKind::Error,
        message: message.to_string(),
    }) {
        let mut writer = writer.lock().await;
        let _ = frame::write_encrypted(&mut *writer, FrameType::State, &body, session_key).await;
        let _ = writer.flush().await;
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
