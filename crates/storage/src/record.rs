// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The RunQueue persistence record (§3, §4.4.6).
//!
//! Saved as a zstd-compressed JSON blob, not plain JSON: a single `.rq`
//! snapshot is written on every persist, not just at shutdown, so it's
//! worth the compression.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rq_core::{ItemId, QueueItem};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StorageError;

/// zstd compression level applied to the snapshot body — a good balance
/// of speed and ratio for a file written on every persist, not just at
/// shutdown.
const COMPRESSION_LEVEL: i32 = 3;

/// The tuple `(items_map, queue_order, next_id_counter)` from §3/§4.4.6.
///
/// Terminal-safe by construction: the engine is responsible for rewriting
/// any `Running` item to `Stopped` in the snapshot it builds *before*
/// constructing a `PersistRecord` (§4.4.6's `save_running_as_stopped`
/// flag); this type has no opinion on item status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistRecord {
    pub items: HashMap<ItemId, QueueItem>,
    pub queue_order: Vec<ItemId>,
    pub next_id: u64,
}

impl PersistRecord {
    pub fn new(items: HashMap<ItemId, QueueItem>, queue_order: Vec<ItemId>, next_id: u64) -> Self {
        Self {
            items,
            queue_order,
            next_id,
        }
    }

    /// Write the record to `path`, zstd-compressed, via a tmp-file +
    /// atomic rename so a crash mid-write never corrupts the last good
    /// snapshot.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec(self)?;
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            zstd::stream::copy_encode(json.as_slice(), &mut writer, COMPRESSION_LEVEL)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load a record previously written by [`Self::save`]. Returns
    /// `Ok(None)` if `path` does not exist (fresh workspace).
    pub fn load(path: &Path) -> Result<Option<Self>, StorageError> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        let decoder = zstd::stream::read::Decoder::new(file)?;
        let record: Self = match serde_json::from_reader(BufReader::new(decoder)) {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, path = %path.display(), "failed to decode persistence snapshot");
                return Err(err.into());
            }
        };
        Ok(Some(record))
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
