// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The client side of the §4.5 authenticator state machine.
//!
//! 1. Generate a fresh RSA keypair for this connection (never persisted)
//!    and send its public key as `PubKey`, unencrypted.
//! 2. Receive `SessionKey`, RSA-decrypt it with the private half of that
//!    keypair.
//! 3. Send `Login`, AES-EAX encrypted under the new session key.
//! 4. Receive `State(LoginAccepted | LoginError)`.

use rq_core::RunQueueError;
use rq_transport::{crypto, frame, FrameType, LoginBody, StateBody, StateKind, SESSION_KEY_LEN};
use tokio::net::TcpStream;

/// The outcome of a successful handshake: the connected socket and the
/// session key every subsequent frame is encrypted under.
pub(crate) struct Handshake {
    pub(crate) stream: TcpStream,
    pub(crate) session_key: [u8; SESSION_KEY_LEN],
}

pub(crate) async fn connect(addr: &str, password: &str) -> Result<Handshake, RunQueueError> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|e| RunQueueError::TransportClosed(e.to_string()))?;

    let keys = crypto::KeyPair::generate().map_err(|e| RunQueueError::AuthenticationError(e.to_string()))?;
    let public_der = keys
        .public_key_der()
        .map_err(|e| RunQueueError::AuthenticationError(e.to_string()))?;
    frame::write_plain(&mut stream, FrameType::PubKey, &public_der)
        .await
        .map_err(|e| RunQueueError::TransportClosed(e.to_string()))?;

    let session_key_frame = frame::read_frame(&mut stream, None)
        .await
        .map_err(|e| RunQueueError::TransportClosed(e.to_string()))?;
    if session_key_frame.frame_type != FrameType::SessionKey {
        return Err(RunQueueError::AuthenticationError(
            "server did not send SessionKey first".into(),
        ));
    }
    let session_key_bytes = keys
        .decrypt(&session_key_frame.body)
        .map_err(|e| RunQueueError::AuthenticationError(e.to_string()))?;
    if session_key_bytes.len() != SESSION_KEY_LEN {
        return Err(RunQueueError::AuthenticationError(
            "server sent a malformed session key".into(),
        ));
    }
    let mut session_key = [0u8; SESSION_KEY_LEN];
    session_key.copy_from_slice(&session_key_bytes);

    let login_body = serde_json::to_vec(&LoginBody {
        password: password.to_string(),
    })
    .map_err(|e| RunQueueError::TransportClosed(e.to_string()))?;
    frame::write_encrypted(&mut stream, FrameType::Login, &login_body, &session_key)
        .await
        .map_err(|e| RunQueueError::TransportClosed(e.to_string()))?;

    let state_frame = frame::read_frame(&mut stream, Some(&session_key))
        .await
        .map_err(|e| RunQueueError::TransportClosed(e.to_string()))?;
    if state_frame.frame_type != FrameType::State {
        return Err(RunQueueError::AuthenticationError("expected State frame".into()));
    }
    let state: StateBody =
        serde_json::from_slice(&state_frame.body).map_err(|e| RunQueueError::TransportClosed(e.to_string()))?;
    match state.kind {
        StateKind::LoginAccepted => Ok(Handshake { stream, session_key }),
        StateKind::LoginError => Err(RunQueueError::AuthenticationError(state.message)),
        _ => Err(RunQueueError::AuthenticationError(format!(
            "unexpected state reply: {}",
            state.message
        ))),
    }
}

#[cfg(test)]
#[path = "handshake_tests.rs"]
mod tests;
