// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Item identifiers and the monotonic allocator that hands them out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a queue item.
///
/// Allocated monotonically by [`IdAllocator`] and never reused, even after
/// the item is deleted (spec §3 invariant: "id values are unique for the
/// life of the engine; deletion does not recycle").
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Hands out strictly increasing [`ItemId`]s.
///
/// Backed by an `AtomicU64` rather than a lock: allocation never needs to
/// observe or mutate any other engine state, so it does not participate in
/// the items/queue-order/workers lock ordering (§5).
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Create an allocator that will hand out `start` next.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Allocate the next id.
    pub fn next(&self) -> ItemId {
        ItemId(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// The id that will be returned by the next call to [`Self::next`].
    ///
    /// Used by persistence (§4.4.6) to snapshot `next_id` without allocating.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }

    /// Rewind or fast-forward the allocator to hand out `next` next.
    ///
    /// Used by `load_from_record` (§4.4.6) to restore the persisted
    /// `next_id` counter atomically with the rest of engine state.
    pub fn reset(&self, next: u64) {
        self.next.store(next, Ordering::SeqCst);
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
