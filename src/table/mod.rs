//! The persistence seam between [`NoteStore`](crate::store::NoteStore) and
//! whatever actually holds the notes.
//!
//! Two implementations ship with the crate:
//! - [`Database`](crate::db::Database) for local mode (direct SQLite access)
//! - [`RemoteTable`] for talking to a `quicknotes serve` instance over HTTP

mod local;
mod remote;

pub use remote::RemoteTable;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Note;

/// Any failure reported by a note table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Note not found: {0}")]
    NotFound(Uuid),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// A remote table of notes.
///
/// There is no optimistic-concurrency token: the last write to reach the
/// table wins.
#[async_trait]
pub trait NoteTable: Send + Sync {
    /// Every note, ordered by timestamp descending.
    async fn list_all(&self) -> Result<Vec<Note>, StorageError>;

    /// Create a note. The table assigns id and timestamp.
    async fn create(&self, content: &str) -> Result<Note, StorageError>;

    /// Replace a note's content and timestamp.
    async fn update(
        &self,
        id: Uuid,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Note, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<(), StorageError>;
}
