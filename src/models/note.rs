use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note as stored in the table and shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    /// Trimmed, never blank once persisted.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Inline edit mode. Client-only, never sent over the wire.
    #[serde(skip)]
    pub is_editing: bool,
}

impl Note {
    /// Order two notes newest first.
    pub fn newest_first(a: &Note, b: &Note) -> std::cmp::Ordering {
        b.timestamp.cmp(&a.timestamp)
    }
}

/// Input for creating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub content: String,
}

/// Input for replacing a note's mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNoteInput {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Sort a list so the most recent timestamp comes first.
///
/// Stable, so notes sharing a timestamp keep the order the table gave them.
pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(Note::newest_first);
}
