// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport-level errors (§4.1, §7).
//!
//! IO, codec, and framing failures, plus the crypto-specific variants the
//! hybrid RSA/AES scheme needs.

use thiserror::Error;

/// Everything that can go wrong reading or writing a frame.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("frame too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("connection closed")]
    ConnectionClosed,

    #[error("timed out waiting for a frame")]
    Timeout,

    #[error("authentication failed: {0}")]
    AuthenticationError(String),

    #[error("malformed frame: {0}")]
    BadFrame(String),
}
