//! Whole-list note persistence over a key-value store.
//!
//! # Responsibility
//! - Read and write the full note sequence as one JSON array.
//! - Degrade reads to an empty list instead of surfacing storage faults.
//!
//! # Invariants
//! - All notes live under `NOTES_KEY`; there is no per-note record.
//! - `read_all` never fails. Missing, unreadable and corrupt records all
//!   yield `[]`.
//! - `load` yields `[]` for missing and corrupt records but surfaces backend
//!   read failures.
//! - `write_all` overwrites the record in full and logs its own failures.

use super::{KeyValueStore, StoreResult};
use crate::model::note::Note;
use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Instant;

/// Fixed key holding the serialized note list.
pub const NOTES_KEY: &str = "@field_notes:notes";

/// Adapter storing all notes as a single serialized record.
#[derive(Clone)]
pub struct NoteStore {
    kv: Arc<dyn KeyValueStore>,
}

impl NoteStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Loads the full note sequence, newest first. Never fails.
    pub async fn read_all(&self) -> Vec<Note> {
        self.load().await.unwrap_or_else(|err| {
            error!(
                "event=notes_read module=store status=error error_code=store_read_failed error={err}"
            );
            Vec::new()
        })
    }

    /// Loads the full note sequence for a read-modify-write cycle.
    ///
    /// Backend failures are returned so callers never overwrite a record
    /// they could not read. A missing or undecodable record loads as `[]`.
    pub async fn load(&self) -> StoreResult<Vec<Note>> {
        let started_at = Instant::now();
        let Some(raw) = self.kv.get(NOTES_KEY).await? else {
            debug!("event=notes_read module=store status=empty");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => {
                debug!(
                    "event=notes_read module=store status=ok count={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(notes)
            }
            Err(err) => {
                warn!(
                    "event=notes_read module=store status=error error_code=store_decode_failed bytes={} error={err}",
                    raw.len()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Serializes `notes` and replaces the stored record.
    pub async fn write_all(&self, notes: &[Note]) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = match serde_json::to_string(notes) {
            Ok(raw) => self.kv.set(NOTES_KEY, raw).await,
            Err(err) => Err(err.into()),
        };

        match &result {
            Ok(()) => debug!(
                "event=notes_write module=store status=ok count={} duration_ms={}",
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=notes_write module=store status=error error_code=store_write_failed count={} error={err}",
                notes.len()
            ),
        }
        result
    }

    /// Removes the stored record entirely.
    pub async fn clear(&self) -> StoreResult<()> {
        let result = self.kv.remove(NOTES_KEY).await;
        if let Err(err) = &result {
            error!(
                "event=notes_clear module=store status=error error_code=store_clear_failed error={err}"
            );
        }
        result
    }
}
