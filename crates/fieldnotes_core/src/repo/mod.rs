//! Repository layer over the note store.
//!
//! # Responsibility
//! - Own id assignment, timestamping and list ordering for notes.
//! - Keep key-value and serialization details behind `NoteStore`.
//!
//! # Invariants
//! - Every mutation is a full read-modify-write of the note list.
//! - Mutations on one repository instance never interleave.

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure for mutating note operations.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "note persistence failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
