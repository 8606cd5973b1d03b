// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authenticator state machine run once per accepted connection
//! (§4.5).
//!
//! 1. Receive `PubKey` (the client's, generated fresh per connection).
//! 2. Generate a session key, send it back `SessionKey`-encrypted under
//!    that public key.
//! 3. Receive `Login`, AES-decrypted with the new session key.
//! 4. Compare `SHA-512(salt || password)`; reply `State(LoginAccepted |
//!    LoginError)`.
//!
//! The server never generates its own RSA keypair — only the client
//! needs one, to receive the session key (§4.1, §4.5).

use rq_transport::{crypto, frame, FrameType, LoginBody, StateBody, StateKind, TransportError, SESSION_KEY_LEN};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// The outcome of a successful handshake: the session key this
/// connection will use for every subsequent frame.
pub struct Authenticated {
    pub session_key: [u8; SESSION_KEY_LEN],
}

/// Run the handshake to completion. On any failure the caller should
/// close the socket (§4.1: "failure modes... cause the peer to close the
/// socket"); this function has already tried to notify the peer with a
/// `State` frame where the protocol allows it.
pub async fn authenticate<S: AsyncReadExt + AsyncWriteExt + Unpin>(
    stream: &mut S,
    expected_password: &str,
) -> Result<Authenticated, TransportError> {
    let pubkey_frame = frame::read_frame(stream, None).await?;
    if pubkey_frame.frame_type != FrameType::PubKey {
        send_plain_error(stream, "expected PubKey frame first").await;
        return Err(TransportError::AuthenticationError(
            "client did not send PubKey first".into(),
        ));
    }
    let client_public_key = crypto::decode_public_key(&pubkey_frame.body)?;

    let session_key = crypto::generate_session_key();
    let encrypted_key = crypto::rsa_encrypt(&client_public_key, &session_key)?;
    frame::write_plain(stream, FrameType::SessionKey, &encrypted_key).await?;

    let login_frame = frame::read_frame(stream, Some(&session_key)).await?;
    if login_frame.frame_type != FrameType::Login {
        send_plain_error(stream, "expected Login frame").await;
        return Err(TransportError::AuthenticationError("expected Login frame".into()));
    }
    let login: LoginBody = serde_json::from_slice(&login_frame.body)?;

    if crypto::hash_password(&login.password) != crypto::hash_password(expected_password) {
        let body = serde_json::to_vec(&StateBody {
            kind: StateKind::LoginError,
            message: "bad password".to_string(),
        })?;
        let _ = frame::write_encrypted(stream, FrameType::State, &body, &session_key).await;
        return Err(TransportError::AuthenticationError("bad password".into()));
    }

    let body = serde_json::to_vec(&StateBody {
        kind: StateKind::LoginAccepted,
        message: "welcome".to_string(),
    })?;
    frame::write_encrypted(stream, FrameType::State, &body, &session_key).await?;

    Ok(Authenticated { session_key })
}

async fn send_plain_error<S: AsyncWriteExt + Unpin>(stream: &mut S, message: &str) {
    if let Ok(body) = serde_json::to_vec(&StateBody {
        kind: StateKind::Error,
        message: message.to_string(),
    }) {
        let _ = frame::write_plain(stream, FrameType::State, &body).await;
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
