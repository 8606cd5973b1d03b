// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The proxy's table of in-flight calls (§4.6): a monotonic `call_id`
//! allocator paired with a one-shot response slot per outstanding call,
//! resolved by [`crate::receiver`] when the correlated `MethodReturn`
//! arrives.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rq_core::{ApiResult, CallId};
use tokio::sync::oneshot;
use tracing::warn;

#[derive(Default)]
pub(crate) struct PendingCalls {
    next_id: AtomicU64,
    slots: Mutex<HashMap<CallId, oneshot::Sender<ApiResult>>>,
}

impl PendingCalls {
    pub(crate) fn allocate(&self) -> CallId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Register a fresh slot for `call_id`, returning the receiving half
    /// the caller blocks on.
    pub(crate) fn register(&self, call_id: CallId) -> oneshot::Receiver<ApiResult> {
        let (tx, rx) = oneshot::channel();
        self.slots.lock().insert(call_id, tx);
        rx
    }

    /// Deliver `result` to the slot `call_id` registered, if any is still
    /// waiting. An unknown id (already timed out, or never registered by
    /// this process) is logged and dropped rather than treated as an
    /// error (§4.6: "drop unknown ids with a warning").
    pub(crate) fn resolve(&self, call_id: CallId, result: ApiResult) {
        match self.slots.lock().remove(&call_id) {
            Some(tx) => {
                let _ = tx.send(result);
            }
            None => warn!(call_id, "MethodReturn for unknown or already-resolved call_id"),
        }
    }

    /// Drop a slot without resolving it, e.g. after the caller gave up
    /// waiting (timeout) or the send that would have reached the server
    /// failed outright.
    pub(crate) fn cancel(&self, call_id: CallId) {
        self.slots.lock().remove(&call_id);
    }

    /// Fail every still-pending call, e.g. because the receiver task
    /// observed the connection close. Leaves the table empty.
    pub(crate) fn fail_all(&self, message: &str) {
        for (_, tx) in self.slots.lock().drain() {
            let _ = tx.send(ApiResult::Err {
                kind: "TransportClosed".to_string(),
                message: message.to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
