// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rq-transport: the length-prefixed, encrypted frame codec underlying the
//! RunQueue remote façade (§4.1).
//!
//! Bootstraps a session with RSA-OAEP-2048, then frames every subsequent
//! message AES-EAX under a freshly generated 32-byte session key. This
//! crate only understands frames and the handshake primitives; the shape
//! of a `Pickle` frame's body is defined by the engine API layer
//! (`rq-core::api`), not here (§4.1).

pub mod crypto;
pub mod error;
pub mod frame;

pub use crypto::{KeyPair, NONCE_LEN, RSA_KEY_BITS, SESSION_KEY_LEN};
pub use error::TransportError;
pub use frame::{Frame, FrameType, LoginBody, StateBody, StateKind, MAX_FRAME_SIZE};

/// Default timeout applied to a single frame receive (§5), so a listener
/// loop can periodically observe a shutdown signal instead of blocking
/// forever on `read_frame`.
pub const DEFAULT_FRAME_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(500);

/// Default client-proxy call timeout (§5).
pub const DEFAULT_CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Client-proxy timeout for bulk operations such as log retrieval (§5).
pub const LOG_FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(20);

/// Default port (§6).
pub const DEFAULT_PORT: u16 = 5454;
