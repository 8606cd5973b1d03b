// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workspace lock file (§4.4.7, §6).
//!
//! Acquired with `fs2::FileExt::try_lock_exclusive`. The lock file's
//! content is purely advisory text for a human who finds the file while
//! the engine isn't running — liveness here is the OS file lock itself,
//! which is released automatically if the holding process dies, so no
//! PID parsing is needed to answer "is the holder alive".

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::StorageError;

/// Default lock file name, per §6 (`.<app>_workspace.lock`).
pub const LOCK_FILE_NAME: &str = ".runqueue_workspace.lock";

/// A held exclusive lock on a workspace directory.
///
/// The lock is released when this value is dropped (the OS releases the
/// `flock` when the file descriptor closes), so callers simply keep it
/// alive for the engine's lifetime.
pub struct WorkspaceLock {
    file: File,
    path: PathBuf,
}

impl WorkspaceLock {
    /// Acquire the lock for `workspace_dir`, creating the lock file if
    /// needed.
    ///
    /// Fails with [`StorageError::WorkspaceInUse`] if another live holder
    /// already has the lock (§4.4.7: "callers may override interactively
    /// at a layer above the core" — that override is a `force` flag
    /// exposed here rather than at this layer, since the core has no
    /// notion of an interactive prompt).
    pub fn acquire(workspace_dir: &Path) -> Result<Self, StorageError> {
        Self::acquire_inner(workspace_dir, false)
    }

    /// Acquire the lock, breaking any stale lock held by a dead process.
    /// An OS `flock` cannot itself be stale (it disappears with its
    /// holder), so "force" here only means: overwrite the warning text
    /// and take the lock via a fresh handle, still failing if a live
    /// holder contests it.
    pub fn acquire_forced(workspace_dir: &Path) -> Result<Self, StorageError> {
        Self::acquire_inner(workspace_dir, true)
    }

    fn acquire_inner(workspace_dir: &Path, force: bool) -> Result<Self, StorageError> {
        std::fs::create_dir_all(workspace_dir)?;
        let path = workspace_dir.join(LOCK_FILE_NAME);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let acquired = if force {
            file.lock_exclusive().is_ok()
        } else {
            file.try_lock_exclusive().is_ok()
        };
        if !acquired {
            return Err(StorageError::WorkspaceInUse);
        }

        let mut file = file;
        file.set_len(0)?;
        use std::io::Seek;
        file.seek(std::io::SeekFrom::Start(0))?;
        writeln!(
            file,
            "This workspace is in use by a RunQueue engine (pid {}).\n\
             Do not edit run_queue_data.rq or the logs/ directory while this file exists.",
            std::process::id()
        )?;
        file.sync_all()?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
