// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatches a decoded `MethodCall` onto the engine and produces the
//! correlated `MethodReturn` (§4.5, §4.7, §9).
//!
//! One `serde` struct per method names and types its argument shape
//! explicitly — the "explicit versioned encoding" §9 calls for, rather
//! than re-deriving shapes from reflection. An argument payload that
//! doesn't deserialize into the shape the named method expects is a
//! protocol violation, not a method-level error, and is reported as a
//! `Codec` error result rather than executed.

use std::sync::Arc;

use rq_core::{ApiResult, IdKeyed, ItemId, QueueItemConfig, RunQueueApi};
use serde::Deserialize;

#[derive(Deserialize)]
struct AddArgs {
    name: String,
    config: QueueItemConfig,
}

#[derive(Deserialize)]
struct IdArgs {
    id: ItemId,
}

#[derive(Deserialize)]
struct MoveRelativeArgs {
    id: ItemId,
    delta: i64,
}

#[derive(Deserialize)]
struct MoveToArgs {
    id: ItemId,
    pos: usize,
}

#[derive(Deserialize)]
struct DoActionArgs {
    id: ItemId,
    action: rq_core::Action,
}

#[derive(Deserialize)]
struct ForceStopArgs {
    msg: String,
}

#[derive(Deserialize)]
struct SetPoolSizeArgs {
    n: i64,
}

#[derive(Deserialize)]
struct CommandLineOutputArgs {
    id: ItemId,
    seek_end: i64,
    max_bytes: i64,
}

#[derive(Deserialize)]
struct SetItemConfigArgs {
    id: ItemId,
    new_config: QueueItemConfig,
}

/// Run `method` against `engine` with JSON-encoded `args`, returning the
/// wire-ready [`ApiResult`]. Never panics on malformed input — a
/// deserialize failure becomes `ApiResult::Err { kind: "Codec", .. }`.
pub async fn dispatch(engine: &Arc<dyn RunQueueApi>, method: &str, args: serde_json::Value) -> ApiResult {
    macro_rules! parse {
        ($ty:ty) => {
            match serde_json::from_value::<$ty>(args) {
                Ok(v) => v,
                Err(e) => {
                    return ApiResult::Err {
                        kind: "Codec".to_string(),
                        message: format!("bad arguments for {method}: {e}"),
                    }
                }
            }
        };
    }

    match method {
        "add" => {
            let a = parse!(AddArgs);
            to_result(engine.add(a.name, a.config).await)
        }
        "cancel" => {
            let a = parse!(IdArgs);
            to_result(engine.cancel(a.id).await)
        }
        "stop" => {
            let a = parse!(IdArgs);
            to_result(engine.stop(a.id).await)
        }
        "delete" => {
            let a = parse!(IdArgs);
            to_result(engine.delete(a.id).await)
        }
        "move_relative" => {
            let a = parse!(MoveRelativeArgs);
            to_result(engine.move_relative(a.id, a.delta).await)
        }
        "move_to" => {
            let a = parse!(MoveToArgs);
            to_result(engine.move_to(a.id, a.pos).await)
        }
        "do_action" => {
            let a = parse!(DoActionArgs);
            to_result(engine.do_action(a.id, a.action).await)
        }
        "start_autoprocessing" => to_result(engine.start_autoprocessing().await),
        "stop_autoprocessing" => to_result(engine.stop_autoprocessing().await),
        "force_stop_all_running" => {
            let a = parse!(ForceStopArgs);
            to_result(engine.force_stop_all_running(a.msg).await)
        }
        "set_pool_size" => {
            let a = parse!(SetPoolSizeArgs);
            to_result(engine.set_pool_size(a.n).await)
        }
        "queue_snapshot" => to_result(engine.queue_snapshot().await),
        "items_snapshot" => to_result(items_as_pairs(engine.items_snapshot().await)),
        "command_line_info" => to_result(info_as_pairs(engine.command_line_info().await)),
        "command_line_output" => {
            let a = parse!(CommandLineOutputArgs);
            to_result(engine.command_line_output(a.id, a.seek_end, a.max_bytes).await)
        }
        "get_item_config" => {
            let a = parse!(IdArgs);
            to_result(engine.get_item_config(a.id).await)
        }
        "set_item_config" => {
            let a = parse!(SetItemConfigArgs);
            to_result(engine.set_item_config(a.id, a.new_config).await)
        }
        other => ApiResult::Err {
            kind: "TransportClosed".to_string(),
            message: format!("unknown method {other}"),
        },
    }
}

/// `items_snapshot`'s wire shape is a plain `Vec<QueueItem>` — each item
/// already carries its own `id`, so no pairing is even needed; the client
/// proxy rebuilds the map keyed by `item.id` on receipt.
fn items_as_pairs(
    result: Result<std::collections::HashMap<ItemId, rq_core::QueueItem>, rq_core::RunQueueError>,
) -> Result<Vec<rq_core::QueueItem>, rq_core::RunQueueError> {
    result.map(|m| m.into_values().collect())
}

/// `command_line_info`'s wire shape: explicit `(id, info)` pairs rather
/// than a `HashMap<ItemId, _>` (see [`IdKeyed`]).
fn info_as_pairs(
    result: Result<std::collections::HashMap<ItemId, rq_core::CommandLineInfo>, rq_core::RunQueueError>,
) -> Result<Vec<IdKeyed<rq_core::CommandLineInfo>>, rq_core::RunQueueError> {
    result.map(|m| m.into_iter().map(|(id, info)| IdKeyed::new(id, info)).collect())
}

fn to_result<T: serde::Serialize>(result: Result<T, rq_core::RunQueueError>) -> ApiResult {
    match result {
        Ok(v) => ApiResult::ok(v),
        Err(e) => ApiResult::from(&e),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
