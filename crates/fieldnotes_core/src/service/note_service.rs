//! Note use-case service.
//!
//! # Responsibility
//! - Load the list, falling back to the remote seed page for an empty store.
//! - Validate drafts before create/update.
//! - Best-effort mirror newly created notes.
//!
//! # Invariants
//! - The local store is authoritative; mirror output is never persisted.
//! - A failed mirror never rolls back the local create.
//! - Updates are local only.

use crate::model::note::{Note, NoteDraft, NotePatch, NoteValidationError};
use crate::remote::{MirrorClient, MirrorError};
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    Validation(NoteValidationError),
    Repo(RepoError),
    /// Remote seed fetch failed while the local store was empty.
    Mirror(MirrorError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Mirror(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Mirror(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<MirrorError> for NoteServiceError {
    fn from(value: MirrorError) -> Self {
        Self::Mirror(value)
    }
}

/// Where a loaded list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource {
    Local,
    RemoteSeed,
}

/// List result envelope used by front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedNotes {
    pub notes: Vec<Note>,
    pub source: NoteSource,
}

/// Outcome of the write-through attempted after a local create.
#[derive(Debug)]
pub enum MirrorOutcome {
    Mirrored { remote_id: String },
    Failed(MirrorError),
    /// No mirror is configured.
    Disabled,
}

/// Local create result plus the write-through outcome.
#[derive(Debug)]
pub struct CreatedNote {
    pub note: Note,
    pub mirror: MirrorOutcome,
}

/// Note service facade over the repository and an optional mirror.
pub struct NoteService {
    repo: NoteRepository,
    mirror: Option<Arc<dyn MirrorClient>>,
}

impl NoteService {
    pub fn new(repo: NoteRepository, mirror: Option<Arc<dyn MirrorClient>>) -> Self {
        Self { repo, mirror }
    }

    /// Service without remote access.
    pub fn offline(repo: NoteRepository) -> Self {
        Self::new(repo, None)
    }

    pub fn repository(&self) -> &NoteRepository {
        &self.repo
    }

    /// Returns local notes, or the remote seed page when the store is empty.
    ///
    /// Seed notes are returned for display only.
    pub async fn load_notes(&self) -> Result<LoadedNotes, NoteServiceError> {
        let notes = self.repo.list().await;
        if !notes.is_empty() {
            return Ok(LoadedNotes {
                notes,
                source: NoteSource::Local,
            });
        }

        match self.mirror.as_ref() {
            Some(mirror) => Ok(LoadedNotes {
                notes: mirror.fetch_seed().await?,
                source: NoteSource::RemoteSeed,
            }),
            None => Ok(LoadedNotes {
                notes,
                source: NoteSource::Local,
            }),
        }
    }

    pub async fn get_note(&self, id: &str) -> Option<Note> {
        self.repo.get(id).await
    }

    /// Validates `draft`, stores it locally, then mirrors it.
    pub async fn create_note(&self, draft: NoteDraft) -> Result<CreatedNote, NoteServiceError> {
        let draft = draft.normalized()?;
        let note = self.repo.create(draft).await?;

        let mirror = match self.mirror.as_ref() {
            None => MirrorOutcome::Disabled,
            Some(mirror) => match mirror.mirror(&note).await {
                Ok(mirrored) => MirrorOutcome::Mirrored {
                    remote_id: mirrored.remote_id,
                },
                Err(err) => {
                    warn!(
                        "event=note_create module=service status=mirror_failed note_id={} error={err}",
                        note.id
                    );
                    MirrorOutcome::Failed(err)
                }
            },
        };

        Ok(CreatedNote { note, mirror })
    }

    /// Validates `draft` and replaces every editable field of note `id`.
    ///
    /// Returns `Ok(None)` when no note has that id.
    pub async fn update_note(
        &self,
        id: &str,
        draft: NoteDraft,
    ) -> Result<Option<Note>, NoteServiceError> {
        let draft = draft.normalized()?;
        Ok(self.repo.update(id, NotePatch::from(draft)).await?)
    }

    pub async fn delete_note(&self, id: &str) -> Result<(), NoteServiceError> {
        Ok(self.repo.delete(id).await?)
    }

    /// Removes every stored note.
    pub async fn clear_notes(&self) -> Result<(), NoteServiceError> {
        Ok(self.repo.clear().await?)
    }
}
