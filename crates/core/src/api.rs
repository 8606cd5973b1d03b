// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared engine-API wire contract (§4.7, §9).
//!
//! Both `rq-server` and `rq-client` serialize this enum as the body of a
//! transport `Pickle` frame (the transport layer never looks inside it,
//! per §4.1). This is an explicit, versioned shape rather than reflective
//! method/signal dispatch: a method call, its correlated
//! return, or a relayed event — nothing else is accepted (§9 design note:
//! "do not execute arbitrary serialized code from the peer").
//!
//! [`RunQueueApi`] is the trait both endpoints satisfy (§9 design note:
//! "a shared interface/trait declaring the engine API plus an
//! event-subscription capability"): `rq-engine::RunQueue` implements it
//! directly, `rq-client::RunQueueProxy` implements it by forwarding every
//! call over a [`ApiMessage::MethodCall`]/[`ApiMessage::MethodReturn`]
//! round trip. `rq-core` depends on neither crate, so the trait lives
//! here as the contract both sides are built against.

use crate::action::Action;
use crate::error::RunQueueError;
use crate::event::Event;
use crate::id::ItemId;
use crate::item::{QueueItem, QueueItemConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Monotonic id correlating a [`ApiMessage::MethodCall`] with its
/// [`ApiMessage::MethodReturn`] (§4.6).
pub type CallId = u64;

/// The body of a `Pickle` frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ApiMessage {
    /// Sent client → server: invoke a `RunQueueApi` method.
    MethodCall {
        call_id: CallId,
        method: String,
        args: serde_json::Value,
    },
    /// Sent server → client: the correlated result of a `MethodCall`.
    MethodReturn { call_id: CallId, result: ApiResult },
    /// Sent server → client only: a relayed engine [`Event`]. A client that
    /// sends one is a protocol violation (§4.5).
    SignalEmit { event: Event },
}

/// The outcome of a method call, serialized across the wire so a
/// server-side [`RunQueueError`] can be re-raised client-side with its
/// original type name preserved (§7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ApiResult {
    Ok(serde_json::Value),
    Err { kind: String, message: String },
}

impl ApiResult {
    pub fn ok(value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => ApiResult::Ok(v),
            Err(e) => ApiResult::Err {
                kind: "Codec".to_string(),
                message: e.to_string(),
            },
        }
    }
}

impl From<&RunQueueError> for ApiResult {
    fn from(err: &RunQueueError) -> Self {
        ApiResult::Err {
            kind: error_kind(err).to_string(),
            message: err.to_string(),
        }
    }
}

/// The bare variant name of a [`RunQueueError`], used as the wire `kind`
/// and re-prefixed onto the message when the client re-raises it (§7:
/// "re-raised... with the original type name preserved as a string
/// prefix").
pub fn error_kind(err: &RunQueueError) -> &'static str {
    match err {
        RunQueueError::NotFound(_) => "NotFound",
        RunQueueError::IllegalAction(_) => "IllegalAction",
        RunQueueError::ConfigurationIsFirm(_) => "ConfigurationIsFirm",
        RunQueueError::HasRunningItems => "HasRunningItems",
        RunQueueError::WorkspaceInUse => "WorkspaceInUse",
        RunQueueError::AuthenticationError(_) => "AuthenticationError",
        RunQueueError::Timeout => "Timeout",
        RunQueueError::TransportClosed(_) => "TransportClosed",
        RunQueueError::Remote { .. } => "Remote",
    }
}

/// Per-item console metadata returned by `command_line_info` (§4.4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandLineInfo {
    pub name: String,
    pub path: String,
    pub file_size: u64,
    pub is_running: bool,
}

/// Result of `command_line_output` (§4.4.5).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CommandLineOutput {
    pub text: String,
    pub last_modified: i64,
}

/// Wire shape for a `HashMap<ItemId, _>` snapshot.
///
/// A map keyed by a newtype like [`crate::ItemId`] round-trips through
/// `serde_json` well enough in-process, but the wire contract should not
/// lean on that: a `Vec` of explicit pairs is the shape both `rq-server`
/// and `rq-client` agree on (§9: "explicit versioned encoding").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdKeyed<T> {
    pub id: crate::id::ItemId,
    pub value: T,
}

impl<T> IdKeyed<T> {
    pub fn new(id: crate::id::ItemId, value: T) -> Self {
        Self { id, value }
    }
}

/// The engine-API contract shared by `rq-engine::RunQueue` (native
/// implementation) and `rq-client::RunQueueProxy` (forwards over
/// `rq-transport`), per §4.7/§9. Every method here is a `MethodCall` the
/// wire protocol can carry; events are the complementary set and are not
/// part of this trait (they are pushed, not called — see [`Event`] and
/// `subscribe`).
#[async_trait]
pub trait RunQueueApi: Send + Sync {
    async fn add(&self, name: String, config: QueueItemConfig) -> Result<ItemId, RunQueueError>;
    async fn cancel(&self, id: ItemId) -> Result<(), RunQueueError>;
    async fn stop(&self, id: ItemId) -> Result<(), RunQueueError>;
    async fn delete(&self, id: ItemId) -> Result<(), RunQueueError>;
    async fn move_relative(&self, id: ItemId, delta: i64) -> Result<(), RunQueueError>;
    async fn move_to(&self, id: ItemId, pos: usize) -> Result<(), RunQueueError>;
    async fn do_action(&self, id: ItemId, action: Action) -> Result<(), RunQueueError>;

    async fn start_autoprocessing(&self) -> Result<(), RunQueueError>;
    async fn stop_autoprocessing(&self) -> Result<(), RunQueueError>;
    async fn force_stop_all_running(&self, msg: String) -> Result<(), RunQueueError>;
    async fn set_pool_size(&self, n: i64) -> Result<(), RunQueueError>;

    async fn queue_snapshot(&self) -> Result<Vec<ItemId>, RunQueueError>;
    async fn items_snapshot(&self) -> Result<HashMap<ItemId, QueueItem>, RunQueueError>;
    async fn command_line_info(&self) -> Result<HashMap<ItemId, CommandLineInfo>, RunQueueError>;
    async fn command_line_output(
        &self,
        id: ItemId,
        seek_end: i64,
        max_bytes: i64,
    ) -> Result<CommandLineOutput, RunQueueError>;
    async fn get_item_config(&self, id: ItemId) -> Result<QueueItemConfig, RunQueueError>;
    async fn set_item_config(&self, id: ItemId, new_config: QueueItemConfig) -> Result<(), RunQueueError>;
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
