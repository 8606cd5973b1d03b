// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-item log file naming and the append+publish sink installed inside
//! a worker before its target function runs (§4.3).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rq_core::clock::Clock;
use rq_core::{ItemId, LogRecord};
use tokio::sync::mpsc::UnboundedSender;

/// Choose a log file path for `id`/`name` under `log_dir` that does not
/// collide with a file left over from a previous attempt (§4.3: "`_k` is
/// chosen to avoid overwriting an existing file").
///
/// Sanitizes `name` to a handful of safe characters so a config name like
/// `"a/b"` can't escape `log_dir`.
pub fn choose_log_path(log_dir: &Path, id: ItemId, name: &str) -> PathBuf {
    let safe_name = sanitize_name(name);
    let bare = log_dir.join(format!("{id}_{safe_name}.out"));
    if !bare.exists() {
        return bare;
    }
    let mut k = 1u64;
    loop {
        let candidate = log_dir.join(format!("{id}_{safe_name}_{k}.out"));
        if !candidate.exists() {
            return candidate;
        }
        k += 1;
    }
}

fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "item".to_string()
    } else {
        cleaned
    }
}

/// Appends formatted log records to a single item's log file and
/// publishes each one on the engine's shared log-event channel (§3, §4.3).
///
/// Installed inside the worker thread before `target_function` runs, so
/// every line the target emits through [`crate::config::WorkerContext`]
/// flows through here.
pub struct LogCapture {
    item_id: ItemId,
    item_name: String,
    path: PathBuf,
    file: std::sync::Mutex<File>,
    offset: AtomicU64,
    clock: Arc<dyn Clock>,
    sender: UnboundedSender<LogRecord>,
}

impl LogCapture {
    /// `path` must already exist (created empty by the supervisor before
    /// spawning the worker, §4.4.2, so a subscriber tailing on
    /// `NewConsoleOutputPath` never misses data).
    pub fn open(
        item_id: ItemId,
        item_name: impl Into<String>,
        path: PathBuf,
        clock: Arc<dyn Clock>,
        sender: UnboundedSender<LogRecord>,
    ) -> std::io::Result<Self> {
        let file = OpenOptions::new().append(true).open(&path)?;
        let offset = file.metadata()?.len();
        Ok(Self {
            item_id,
            item_name: item_name.into(),
            path,
            file: std::sync::Mutex::new(file),
            offset: AtomicU64::new(offset),
            clock,
            sender,
        })
    }

    /// Append `message` (newline-normalized to `\n`) and publish the
    /// corresponding [`LogRecord`]. Write failures are not fatal to the
    /// worker — the record is still published so remote listeners see it
    /// even if the file append failed.
    pub fn append(&self, message: &str) {
        let normalized = normalize_newlines(message);
        let mut line = normalized;
        if !line.ends_with('\n') {
            line.push('\n');
        }

        let file_offset_before_write = self.offset.load(Ordering::SeqCst);
        {
            let mut file = match self.file.lock() {
                Ok(f) => f,
                Err(poisoned) => poisoned.into_inner(),
            };
            if file.write_all(line.as_bytes()).is_ok() {
                self.offset.fetch_add(line.len() as u64, Ordering::SeqCst);
            }
        }

        let record = LogRecord::new(
            self.item_id,
            self.item_name.clone(),
            self.path.to_string_lossy().to_string(),
            self.clock.epoch_ms(),
            file_offset_before_write,
            normalize_newlines(message),
        );
        // A full/dropped receiver means no one is listening; never block
        // or panic the worker over it.
        let _ = self.sender.send(record);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
#[path = "log_capture_tests.rs"]
mod tests;
