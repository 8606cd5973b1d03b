// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time source abstraction so engine and storage tests can control `now`
//! without sleeping real wall-clock time.

use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current time, expressed as milliseconds since the Unix
/// epoch.
///
/// `dt_added`, `dt_started`, and `dt_done` (§3) are all stamped through a
/// `Clock`, so the engine never calls `SystemTime::now()` directly.
pub trait Clock: Send + Sync {
    fn epoch_ms(&self) -> i64;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        now.as_millis() as i64
    }
}

/// A clock a test can advance by hand.
///
/// Starts at `0` unless constructed with [`FakeClock::at`].
#[derive(Debug)]
pub struct FakeClock {
    now_ms: Mutex<i64>,
}

impl FakeClock {
    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms: Mutex::new(now_ms),
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        *self.now_ms.lock() += delta_ms;
    }

    pub fn set(&self, now_ms: i64) {
        *self.now_ms.lock() = now_ms;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::at(0)
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> i64 {
        *self.now_ms.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
