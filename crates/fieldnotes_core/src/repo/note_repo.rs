//! Note repository: create/list/update/delete over the whole-list store.
//!
//! # Responsibility
//! - Assign ids (epoch milliseconds) and creation timestamps.
//! - Keep the stored sequence newest-created first.
//! - Serialize mutating calls through one writer.
//!
//! # Invariants
//! - `create` prepends; no other operation reorders the list.
//! - `update` merges over an existing note and never changes `id` or `date`.
//! - `delete` succeeds whether or not the id was present.
//! - `list` degrades to `[]`; mutating calls surface store failures and
//!   never write after a failed read.

use crate::clock::{Clock, SystemClock};
use crate::model::note::{Note, NoteDraft, NoteId, NotePatch};
use crate::repo::RepoResult;
use crate::store::{KeyValueStore, NoteStore};
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

/// Note repository bound to one injected key-value store.
pub struct NoteRepository {
    store: NoteStore,
    clock: Arc<dyn Clock>,
    last_issued_id: Mutex<i64>,
    writer: AsyncMutex<()>,
}

impl NoteRepository {
    /// Creates a repository using wall-clock time.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(kv, Arc::new(SystemClock))
    }

    /// Creates a repository with a caller-provided time source.
    pub fn with_clock(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: NoteStore::new(kv),
            clock,
            last_issued_id: Mutex::new(i64::MIN),
            writer: AsyncMutex::new(()),
        }
    }

    /// Returns every stored note, newest first. Never fails.
    pub async fn list(&self) -> Vec<Note> {
        self.store.read_all().await
    }

    /// Returns the note with `id`, if stored.
    pub async fn get(&self, id: &str) -> Option<Note> {
        self.store
            .read_all()
            .await
            .into_iter()
            .find(|note| note.id == id)
    }

    /// Stores a new note at the head of the list and returns it.
    pub async fn create(&self, draft: NoteDraft) -> RepoResult<Note> {
        let _writer = self.writer.lock().await;
        let mut notes = self.store.load().await?;

        let now = self.clock.now();
        let id = self.next_id(now.timestamp_millis(), &notes);
        let note = Note::from_draft(id, now, draft);
        notes.insert(0, note.clone());
        self.store.write_all(&notes).await?;

        info!(
            "event=note_create module=repo status=ok note_id={} count={}",
            note.id,
            notes.len()
        );
        Ok(note)
    }

    /// Merges `patch` into the note with `id`.
    ///
    /// Returns `Ok(None)` and leaves the store untouched when no note matches.
    pub async fn update(&self, id: &str, patch: NotePatch) -> RepoResult<Option<Note>> {
        let _writer = self.writer.lock().await;
        let mut notes = self.store.load().await?;

        let Some(index) = notes.iter().position(|note| note.id == id) else {
            info!("event=note_update module=repo status=not_found note_id={id}");
            return Ok(None);
        };

        notes[index].merge(patch);
        let updated = notes[index].clone();
        self.store.write_all(&notes).await?;

        info!("event=note_update module=repo status=ok note_id={id}");
        Ok(Some(updated))
    }

    /// Removes every note whose id equals `id`. Absent ids are not an error.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let _writer = self.writer.lock().await;
        let mut notes = self.store.load().await?;

        let before = notes.len();
        notes.retain(|note| note.id != id);
        self.store.write_all(&notes).await?;

        info!(
            "event=note_delete module=repo status=ok note_id={id} removed={}",
            before - notes.len()
        );
        Ok(())
    }

    /// Removes all notes.
    pub async fn clear(&self) -> RepoResult<()> {
        let _writer = self.writer.lock().await;
        self.store.clear().await?;
        info!("event=notes_clear module=repo status=ok");
        Ok(())
    }

    /// Picks the creation-time id, bumped past ids already issued by this
    /// repository or already present in `existing`.
    fn next_id(&self, now_ms: i64, existing: &[Note]) -> NoteId {
        let mut last = self.last_issued_id.lock();
        let mut candidate = now_ms.max(last.saturating_add(1));
        while existing
            .iter()
            .any(|note| note.id == candidate.to_string())
        {
            candidate += 1;
        }
        *last = candidate;
        candidate.to_string()
    }
}
