// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rq-server: the façade that exposes an in-process [`rq_engine::RunQueue`]
//! over the network (§4.5).
//!
//! Authentication ([`auth`]) hands each accepted connection a session key;
//! [`listener`] reads forwarded method calls off that connection and runs
//! them through [`dispatch`]; a single [`relay`] task republishes engine
//! events to every client in [`clients::ClientRegistry`]. [`RunQueueServer`]
//! ties the four together and owns the workspace lock and shutdown signal.

mod auth;
mod clients;
mod config;
mod dispatch;
mod listener;
mod relay;
mod server;

#[cfg(test)]
mod test_support;

pub use config::ServerConfig;
pub use server::{RunQueueServer, ServerError};
