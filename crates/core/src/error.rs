// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error kinds surfaced to RunQueue callers, shared by the engine and
//! the client proxy (§7).

use crate::id::ItemId;
use thiserror::Error;

/// Every error a caller of the [`crate`] API contract can observe, whether
/// it originated in-process (`rq-engine`) or over the wire (`rq-client`).
#[derive(Debug, Error)]
pub enum RunQueueError {
    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("action not legal for item {0} in its current status")]
    IllegalAction(ItemId),

    #[error("item {0} is running; its configuration cannot be changed")]
    ConfigurationIsFirm(ItemId),

    #[error("persistence requested with running items and save_running_as_stopped=false")]
    HasRunningItems,

    #[error("workspace is locked by another engine instance")]
    WorkspaceInUse,

    #[error("authentication failed: {0}")]
    AuthenticationError(String),

    #[error("call timed out waiting for a response")]
    Timeout,

    #[error("transport closed: {0}")]
    TransportClosed(String),

    /// Reconstructed client-side from a `MethodReturn`'s `{kind, message}`
    /// pair for an error kind this enum has no locally-constructible
    /// variant for (one that carries an `ItemId` the wire contract does
    /// not separately encode, e.g. `NotFound`/`IllegalAction`) — the
    /// server-side type name survives as `kind`, re-raised with it
    /// preserved as a string prefix (§7). The engine itself never
    /// constructs this variant.
    #[error("{kind}: {message}")]
    Remote { kind: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
