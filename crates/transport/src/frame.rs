// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed, optionally-encrypted frame codec (§4.1).
//!
//! Wire format (all integers little-endian):
//!
//! ```text
//! [ payload_size : u32 ][ nonce : 16 bytes ][ ciphertext_or_plaintext : payload_size bytes ]
//! ```
//!
//! `payload_size` counts the inner `[ type : u32 ][ body ]` tuple, which is
//! the thing that may be AES-EAX encrypted. A frame whose nonce is all
//! zero bytes is unencrypted; once a session key is established, receiving
//! such a frame is an error rather than silently accepted as plaintext.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::crypto::{self, NONCE_LEN, SESSION_KEY_LEN, ZERO_NONCE};
use crate::error::TransportError;

/// Frame type tag carried as the first 4 bytes of every (decrypted)
/// payload (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    PubKey,
    SessionKey,
    Login,
    State,
    Pickle,
}

impl FrameType {
    fn to_u32(self) -> u32 {
        match self {
            FrameType::PubKey => 0,
            FrameType::SessionKey => 1,
            FrameType::Login => 2,
            FrameType::State => 3,
            FrameType::Pickle => 4,
        }
    }

    fn from_u32(tag: u32) -> Result<Self, TransportError> {
        match tag {
            0 => Ok(FrameType::PubKey),
            1 => Ok(FrameType::SessionKey),
            2 => Ok(FrameType::Login),
            3 => Ok(FrameType::State),
            4 => Ok(FrameType::Pickle),
            other => Err(TransportError::BadFrame(format!("unknown frame type tag {other}"))),
        }
    }
}

/// `State` frame sub-kind (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateKind {
    Error,
    LoginError,
    LoginAccepted,
    GeneralMsg,
}

/// A decoded frame: its type tag and raw body bytes.
#[derive(Debug, Clone)]
pub struct Frame {
    pub frame_type: FrameType,
    pub body: Vec<u8>,
}

/// Carried as the `Login` frame body, AES-EAX only (§4.1).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginBody {
    pub password: String,
}

/// Carried as the `State` frame body.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StateBody {
    pub kind: StateKind,
    pub message: String,
}

/// Cap on `payload_size` (200 MiB) — protects against a hostile/garbled
/// peer requesting a huge read-buffer allocation.
pub const MAX_FRAME_SIZE: u32 = 200 * 1024 * 1024;

/// Write an unencrypted frame (only legal for `PubKey`, or `State` before a
/// session key exists).
pub async fn write_plain<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    frame_type: FrameType,
    body: &[u8],
) -> Result<(), TransportError> {
    write_raw(writer, frame_type, body, &ZERO_NONCE).await
}

/// Write a frame AES-EAX encrypted under `session_key`, with a fresh random
/// nonce.
pub async fn write_encrypted<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    frame_type: FrameType,
    body: &[u8],
    session_key: &[u8; SESSION_KEY_LEN],
) -> Result<(), TransportError> {
    let nonce = crypto::random_nonce();
    let mut plaintext = Vec::with_capacity(4 + body.len());
    plaintext.extend_from_slice(&frame_type.to_u32().to_le_bytes());
    plaintext.extend_from_slice(body);
    let ciphertext = crypto::aes_encrypt(session_key, &nonce, &plaintext)?;

    let payload_len = ciphertext.len() as u32;
    check_size(payload_len)?;
    writer.write_all(&payload_len.to_le_bytes()).await?;
    writer.write_all(&nonce).await?;
    writer.write_all(&ciphertext).await?;
    writer.flush().await?;
    Ok(())
}

async fn write_raw<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    frame_type: FrameType,
    body: &[u8],
    nonce: &[u8; NONCE_LEN],
) -> Result<(), TransportError> {
    let mut payload = Vec::with_capacity(4 + body.len());
    payload.extend_from_slice(&frame_type.to_u32().to_le_bytes());
    payload.extend_from_slice(body);

    let payload_len = payload.len() as u32;
    check_size(payload_len)?;
    writer.write_all(&payload_len.to_le_bytes()).await?;
    writer.write_all(nonce).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

fn check_size(size: u32) -> Result<(), TransportError> {
    if size > MAX_FRAME_SIZE {
        return Err(TransportError::MessageTooLarge {
            size: size as usize,
            max: MAX_FRAME_SIZE as usize,
        });
    }
    Ok(())
}

/// Read one frame. `session_key` is `None` before the handshake establishes
/// one (only `PubKey`/plaintext `State` are legal then).
pub async fn read_frame<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    session_key: Option<&[u8; SESSION_KEY_LEN]>,
) -> Result<Frame, TransportError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(TransportError::ConnectionClosed);
        }
        Err(e) => return Err(TransportError::Io(e)),
    }
    let payload_len = u32::from_le_bytes(len_buf);
    check_size(payload_len)?;

    let mut nonce = [0u8; NONCE_LEN];
    reader.read_exact(&mut nonce).await?;

    let mut payload = vec![0u8; payload_len as usize];
    reader.read_exact(&mut payload).await?;

    let plaintext = match session_key {
        Some(key) => {
            if nonce == ZERO_NONCE {
                return Err(TransportError::BadFrame(
                    "unencrypted frame received after session key established".into(),
                ));
            }
            crypto::aes_decrypt(key, &nonce, &payload)?
        }
        None => {
            if nonce != ZERO_NONCE {
                return Err(TransportError::BadFrame(
                    "encrypted frame received before session key established".into(),
                ));
            }
            payload
        }
    };

    if plaintext.len() < 4 {
        return Err(TransportError::BadFrame("frame shorter than type tag".into()));
    }
    let mut tag_buf = [0u8; 4];
    tag_buf.copy_from_slice(&plaintext[..4]);
    let frame_type = FrameType::from_u32(u32::from_le_bytes(tag_buf))?;
    let body = plaintext[4..].to_vec();
    Ok(Frame { frame_type, body })
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
