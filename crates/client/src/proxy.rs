// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`RunQueueProxy`]: the method-intercepting client (§4.6, §9).
//!
//! Implements [`RunQueueApi`] by forwarding every call as a correlated
//! `MethodCall`/`MethodReturn` round trip over [`rq_transport`]. A
//! dedicated [`crate::receiver`] task owns the read half of the socket;
//! calls share the write half behind a lock, matching the server's own
//! one-writer-per-connection shape (`rq-server::clients::ClientData`).
//!
//! `connect`/`disconnect` are plain inherent methods, not part of
//! `RunQueueApi` (§4.6: "Connection lifecycle methods... are not
//! intercepted"). A call attempted while disconnected logs a warning and
//! returns a neutral default rather than an error, so a UI can bind to a
//! proxy before it has ever connected (§4.6).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rq_core::{
    Action, ApiMessage, ApiResult, CommandLineInfo, CommandLineOutput, Event, IdKeyed, ItemId, QueueItem,
    QueueItemConfig, RunQueueApi, RunQueueError,
};
use rq_transport::{frame, FrameType, SESSION_KEY_LEN};
use serde::de::DeserializeOwned;
use tokio::io::{split, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::config::ClientConfig;
use crate::handshake;
use crate::pending::PendingCalls;
use crate::receiver;

/// Capacity of the local broadcast channel re-emitting relayed events
/// (§4.6), mirroring the engine's own [`EVENT_CHANNEL_CAPACITY`]-style
/// choice so a momentarily slow local subscriber behaves the same way a
/// direct engine subscriber would.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

struct Connection {
    writer: Arc<AsyncMutex<WriteHalf<TcpStream>>>,
    session_key: [u8; SESSION_KEY_LEN],
    receiver_task: JoinHandle<()>,
}

/// A live (or not-yet-connected) connection to a `RunQueueServer`,
/// presenting the same [`RunQueueApi`] surface the in-process engine
/// does.
pub struct RunQueueProxy {
    connection: AsyncMutex<Option<Connection>>,
    pending: Arc<PendingCalls>,
    events_tx: broadcast::Sender<Event>,
    call_timeout: Duration,
    log_fetch_timeout: Duration,
}

impl Default for RunQueueProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl RunQueueProxy {
    /// A disconnected proxy, ready for [`Self::connect`]. Every
    /// `RunQueueApi` call made before that returns a neutral default and
    /// logs a warning (§4.6).
    pub fn new() -> Self {
        let (events_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            connection: AsyncMutex::new(None),
            pending: Arc::new(PendingCalls::default()),
            events_tx,
            call_timeout: rq_transport::DEFAULT_CALL_TIMEOUT,
            log_fetch_timeout: rq_transport::LOG_FETCH_TIMEOUT,
        }
    }

    /// Override the default per-call timeouts (§5), e.g. for tests.
    pub fn with_timeouts(mut self, call_timeout: Duration, log_fetch_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self.log_fetch_timeout = log_fetch_timeout;
        self
    }

    /// Subscribe to events. Events relayed by the server before
    /// [`Self::connect`] succeeds are never observed (matches
    /// `RunQueue::subscribe`'s own "only sees events published after
    /// this call" contract); on successful connect a synthetic
    /// [`Event::ResetTriggered`] is published first so a subscriber
    /// re-syncs its cache (§4.6).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    /// Run the §4.5 handshake against `config.connect_addr()` and start
    /// the background receiver task. Replaces any existing connection.
    pub async fn connect(&self, config: &ClientConfig) -> Result<(), RunQueueError> {
        let handshake::Handshake { stream, session_key } =
            handshake::connect(&config.connect_addr(), &config.password).await?;

        let (reader, writer) = split(stream);
        let writer = Arc::new(AsyncMutex::new(writer));
        let receiver_task = tokio::task::spawn(receiver::run(
            reader,
            session_key,
            Arc::clone(&self.pending),
            self.events_tx.clone(),
        ));

        let mut slot = self.connection.lock().await;
        if let Some(old) = slot.take() {
            old.receiver_task.abort();
        }
        *slot = Some(Connection {
            writer,
            session_key,
            receiver_task,
        });
        drop(slot);

        // §4.6: "the proxy emits a synthetic ResetTriggered so local
        // caches re-sync."
        let _ = self.events_tx.send(Event::ResetTriggered);
        Ok(())
    }

    /// Tear down the connection, if any. Any calls still in flight are
    /// failed with `TransportClosed`.
    pub async fn disconnect(&self) {
        if let Some(conn) = self.connection.lock().await.take() {
            conn.receiver_task.abort();
        }
        self.pending.fail_all("disconnected");
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Forward `method(args)` to the server and wait up to `timeout` for
    /// the correlated `MethodReturn`. Returns `T::default()` with a
    /// logged warning if not currently connected (§4.6).
    async fn call<T: DeserializeOwned + Default>(
        &self,
        method: &str,
        args: serde_json::Value,
        timeout: Duration,
    ) -> Result<T, RunQueueError> {
        let conn = {
            let slot = self.connection.lock().await;
            slot.as_ref().map(|c| (Arc::clone(&c.writer), c.session_key))
        };
        let Some((writer, session_key)) = conn else {
            warn!(method, "RunQueueApi call attempted while disconnected");
            return Ok(T::default());
        };

        let call_id = self.pending.allocate();
        let rx = self.pending.register(call_id);
        let request = ApiMessage::MethodCall {
            call_id,
            method: method.to_string(),
            args,
        };
        let body = serde_json::to_vec(&request).map_err(|e| RunQueueError::TransportClosed(e.to_string()))?;

        {
            let mut writer = writer.lock().await;
            if let Err(err) = frame::write_encrypted(&mut *writer, FrameType::Pickle, &body, &session_key).await {
                self.pending.cancel(call_id);
                return Err(RunQueueError::TransportClosed(err.to_string()));
            }
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(ApiResult::Ok(value))) => {
                serde_json::from_value(value).map_err(|e| RunQueueError::TransportClosed(e.to_string()))
            }
            Ok(Ok(ApiResult::Err { kind, message })) => Err(RunQueueError::Remote { kind, message }),
            Ok(Err(_recv_dropped)) => Err(RunQueueError::TransportClosed(
                "connection closed while awaiting reply".to_string(),
            )),
            Err(_elapsed) => {
                self.pending.cancel(call_id);
                Err(RunQueueError::Timeout)
            }
        }
    }

    fn default_timeout(&self) -> Duration {
        self.call_timeout
    }
}

#[async_trait]
impl RunQueueApi for RunQueueProxy {
    async fn add(&self, name: String, config: QueueItemConfig) -> Result<ItemId, RunQueueError> {
        self.call("add", serde_json::json!({ "name": name, "config": config }), self.default_timeout())
            .await
    }

    async fn cancel(&self, id: ItemId) -> Result<(), RunQueueError> {
        self.call("cancel", serde_json::json!({ "id": id }), self.default_timeout())
            .await
    }

    async fn stop(&self, id: ItemId) -> Result<(), RunQueueError> {
        self.call("stop", serde_json::json!({ "id": id }), self.default_timeout())
            .await
    }

    async fn delete(&self, id: ItemId) -> Result<(), RunQueueError> {
        self.call("delete", serde_json::json!({ "id": id }), self.default_timeout())
            .await
    }

    async fn move_relative(&self, id: ItemId, delta: i64) -> Result<(), RunQueueError> {
        self.call(
            "move_relative",
            serde_json::json!({ "id": id, "delta": delta }),
            self.default_timeout(),
        )
        .await
    }

    async fn move_to(&self, id: ItemId, pos: usize) -> Result<(), RunQueueError> {
        self.call(
            "move_to",
            serde_json::json!({ "id": id, "pos": pos }),
            self.default_timeout(),
        )
        .await
    }

    async fn do_action(&self, id: ItemId, action: Action) -> Result<(), RunQueueError> {
        self.call(
            "do_action",
            serde_json::json!({ "id": id, "action": action }),
            self.default_timeout(),
        )
        .await
    }

    async fn start_autoprocessing(&self) -> Result<(), RunQueueError> {
        self.call("start_autoprocessing", serde_json::json!({}), self.default_timeout())
            .await
    }

    async fn stop_autoprocessing(&self) -> Result<(), RunQueueError> {
        self.call("stop_autoprocessing", serde_json::json!({}), self.default_timeout())
            .await
    }

    async fn force_stop_all_running(&self, msg: String) -> Result<(), RunQueueError> {
        self.call(
            "force_stop_all_running",
            serde_json::json!({ "msg": msg }),
            self.default_timeout(),
        )
        .await
    }

    async fn set_pool_size(&self, n: i64) -> Result<(), RunQueueError> {
        self.call("set_pool_size", serde_json::json!({ "n": n }), self.default_timeout())
            .await
    }

    async fn queue_snapshot(&self) -> Result<Vec<ItemId>, RunQueueError> {
        self.call("queue_snapshot", serde_json::json!({}), self.default_timeout())
            .await
    }

    async fn items_snapshot(&self) -> Result<HashMap<ItemId, QueueItem>, RunQueueError> {
        let items: Vec<QueueItem> = self
            .call("items_snapshot", serde_json::json!({}), self.default_timeout())
            .await?;
        Ok(items.into_iter().map(|item| (item.id, item)).collect())
    }

    async fn command_line_info(&self) -> Result<HashMap<ItemId, CommandLineInfo>, RunQueueError> {
        let pairs: Vec<IdKeyed<CommandLineInfo>> = self
            .call("command_line_info", serde_json::json!({}), self.default_timeout())
            .await?;
        Ok(pairs.into_iter().map(|pair| (pair.id, pair.value)).collect())
    }

    async fn command_line_output(
        &self,
        id: ItemId,
        seek_end: i64,
        max_bytes: i64,
    ) -> Result<CommandLineOutput, RunQueueError> {
        self.call(
            "command_line_output",
            serde_json::json!({ "id": id, "seek_end": seek_end, "max_bytes": max_bytes }),
            self.log_fetch_timeout,
        )
        .await
    }

    async fn get_item_config(&self, id: ItemId) -> Result<QueueItemConfig, RunQueueError> {
        self.call("get_item_config", serde_json::json!({ "id": id }), self.default_timeout())
            .await
    }

    async fn set_item_config(&self, id: ItemId, new_config: QueueItemConfig) -> Result<(), RunQueueError> {
        self.call(
            "set_item_config",
            serde_json::json!({ "id": id, "new_config": new_config }),
            self.default_timeout(),
        )
        .await
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
