//! Key-value persistence and the note list adapter built on top of it.
//!
//! # Responsibility
//! - Define the `KeyValueStore` seam injected into note persistence.
//! - Provide SQLite-backed and in-memory implementations.
//! - Own the single serialized note record (`NoteStore`).
//!
//! # Invariants
//! - Stores hold UTF-8 text values addressed by string keys.
//! - Implementations never hold a lock across an `.await`.

use crate::db::DbError;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_kv;
pub mod note_store;
pub mod sqlite_kv;

pub use memory_kv::MemoryKvStore;
pub use note_store::{NoteStore, NOTES_KEY};
pub use sqlite_kv::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a key-value backend or by note (de)serialization.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    /// Blocking storage task panicked or was cancelled.
    Join(tokio::task::JoinError),
    /// Backend-specific failure without a structured source.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "note serialization failed: {err}"),
            Self::Join(err) => write!(f, "storage task failed: {err}"),
            Self::Backend(message) => write!(f, "storage backend failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Join(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Join(value)
    }
}

/// Asynchronous string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;
    /// Removes `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}
