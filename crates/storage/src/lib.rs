// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rq-storage: the RunQueue persistence record and workspace lock (§4.4.6,
//! §4.4.7, §6).
//!
//! Two independent concerns live here, both folded into one crate since
//! §4.4.7 makes the workspace lock part of the engine's own persistence
//! story rather than a façade concern:
//!
//! - [`record`] — the `(items, queue_order, next_id)` tuple from §4.4.6,
//!   saved as a zstd-compressed JSON blob with an atomic tmp-then-rename
//!   write.
//! - [`lock`] — the workspace lock file from §4.4.7, acquired with
//!   `fs2::FileExt::try_lock_exclusive`.

pub mod error;
pub mod lock;
pub mod record;

pub use error::StorageError;
pub use lock::WorkspaceLock;
pub use record::PersistRecord;

/// Default file name for the persistence snapshot, per §6.
pub const SNAPSHOT_FILE_NAME: &str = "run_queue_data.rq";

/// Default directory name for per-item log files, per §6.
pub const LOGS_DIR_NAME: &str = "logs";
