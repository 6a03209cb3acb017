//! Core domain logic for Field Notes.
//!
//! Notes are persisted locally as one serialized list in a key-value store;
//! a remote demo API seeds an empty store and receives best-effort copies of
//! new notes.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, MirrorConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Location, Note, NoteDraft, NoteId, NotePatch, NoteValidationError};
pub use remote::{
    HttpMirrorClient, MirrorClient, MirrorError, MirrorOperation, MirrorResult, MirroredNote,
};
pub use repo::note_repo::NoteRepository;
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{
    CreatedNote, LoadedNotes, MirrorOutcome, NoteService, NoteServiceError, NoteSource,
};
pub use store::{
    KeyValueStore, MemoryKvStore, NoteStore, SqliteKvStore, StoreError, StoreResult, NOTES_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
