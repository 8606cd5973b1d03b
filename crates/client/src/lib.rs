// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rq-client: the method-intercepting proxy that makes a remote
//! `RunQueueServer` look, to its caller, exactly like an in-process
//! engine (§4.6, §9).
//!
//! [`RunQueueProxy`] implements [`rq_core::RunQueueApi`] by forwarding
//! every call over [`rq_transport`] as a correlated
//! [`rq_core::ApiMessage::MethodCall`]/`MethodReturn` round trip; a single
//! background task ([`receiver`]) drains inbound frames, resolves pending
//! calls, and re-emits relayed [`rq_core::Event`]s locally so subscribers
//! cannot tell the engine isn't in-process.

mod config;
mod handshake;
mod pending;
mod proxy;
mod receiver;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use proxy::RunQueueProxy;
