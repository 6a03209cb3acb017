//! Remote mirror: seed source and best-effort write-through for notes.
//!
//! # Responsibility
//! - Fetch a small page of remote posts shaped as notes for an empty store.
//! - Echo newly created notes to the remote API.
//!
//! # Invariants
//! - The mirror is one-directional. Nothing it returns is written into the
//!   local store by this module.
//! - Every request is attempted exactly once; failures surface as
//!   `MirrorError`.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::note::Note;

pub mod http_mirror;

pub use http_mirror::HttpMirrorClient;

pub type MirrorResult<T> = Result<T, MirrorError>;

/// Remote operation that failed, carried for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOperation {
    FetchSeed,
    Mirror,
}

impl Display for MirrorOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchSeed => write!(f, "fetch_seed"),
            Self::Mirror => write!(f, "mirror"),
        }
    }
}

#[derive(Debug)]
pub enum MirrorError {
    /// Transport-level failure: connect, timeout, TLS, body read.
    Network {
        operation: MirrorOperation,
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    Status {
        operation: MirrorOperation,
        status: u16,
    },
    /// The response body did not match the expected shape.
    Decode {
        operation: MirrorOperation,
        source: serde_json::Error,
    },
    /// HTTP client could not be constructed.
    Client(reqwest::Error),
}

impl MirrorError {
    pub fn operation(&self) -> Option<MirrorOperation> {
        match self {
            Self::Network { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
            Self::Client(_) => None,
        }
    }
}

impl Display for MirrorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { operation, source } => {
                write!(f, "remote {operation} request failed: {source}")
            }
            Self::Status { operation, status } => {
                write!(f, "remote {operation} returned status {status}")
            }
            Self::Decode { operation, source } => {
                write!(f, "remote {operation} returned malformed body: {source}")
            }
            Self::Client(err) => write!(f, "failed to build http client: {err}"),
        }
    }
}

impl Error for MirrorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Client(err) => Some(err),
            Self::Status { .. } => None,
        }
    }
}

/// Result of a successful write-through.
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredNote {
    /// Identifier assigned by the remote API.
    pub remote_id: String,
    /// The local note as it was sent.
    pub note: Note,
}

/// Remote note source and write-through target.
#[async_trait]
pub trait MirrorClient: Send + Sync {
    /// Fetches the seed page, mapped to notes with fabricated descending dates.
    async fn fetch_seed(&self) -> MirrorResult<Vec<Note>>;
    /// Posts `note` to the remote API and returns the remote-assigned id.
    async fn mirror(&self, note: &Note) -> MirrorResult<MirroredNote>;
}
