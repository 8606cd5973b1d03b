// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The body of a dispatched worker thread (§4.3, §4.4.2).
//!
//! Spawned with `std::thread::spawn` rather than as an OS process
//! (DESIGN.md): Rust has no built-in way to serialize an arbitrary
//! closure across a process boundary, so `target_function` runs
//! in-process and a panic is caught rather than relying on process exit
//! status.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use rq_core::{ItemId, QueueItemConfig};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::{CancelToken, TargetFunction, WorkerContext};
use crate::log_capture::LogCapture;
use crate::state::{WorkerCompletion, WorkerOutcome};

pub(crate) fn run_worker(
    id: ItemId,
    config: QueueItemConfig,
    logger: LogCapture,
    cancel: CancelToken,
    target_function: Arc<dyn TargetFunction>,
    completion_tx: UnboundedSender<WorkerCompletion>,
) {
    let ctx = WorkerContext { logger, cancel };

    let outcome = match std::panic::catch_unwind(AssertUnwindSafe(|| target_function.run(&config, &ctx))) {
        Ok(Ok(())) => WorkerOutcome::Finished,
        Ok(Err(err)) => WorkerOutcome::Failed { stderr: err.to_string() },
        Err(payload) => WorkerOutcome::Failed {
            stderr: format!("Panic:{}", panic_message(&payload)),
        },
    };

    // A send failure means the supervisor (and with it, the engine) is
    // gone; nothing left to report the outcome to.
    let _ = completion_tx.send(WorkerCompletion { id, outcome });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
