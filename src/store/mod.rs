//! The note list and its confirmed-update state machine.
//!
//! # Responsibility
//! - Hold the visible notes, the input buffer, the loading flag and the last error.
//! - Route every write through a [`NoteTable`] and apply it only once confirmed.
//!
//! # Invariants
//! - The list is sorted newest first at all times.
//! - `is_editing` changes never touch the table.
//! - A response applies only if its request token is still the latest for
//!   its note (or for the list load). Older responses are discarded.
//! - The lock is never held across an await, so operations can overlap.

mod state;

pub use state::StoreSnapshot;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::table::{NoteTable, StorageError};
use state::StoreState;

/// What an operation did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The confirmed result is now reflected in the list.
    Applied,
    /// Blank input; no request was sent.
    Skipped,
    /// The response arrived but a newer request, or a removal, made it moot.
    Discarded,
    /// The store was shut down before the response arrived.
    Cancelled,
}

pub struct NoteStore<T> {
    table: Arc<T>,
    state: Mutex<StoreState>,
    shutdown: CancellationToken,
}

impl<T: NoteTable> NoteStore<T> {
    pub fn new(table: T) -> Self {
        Self::with_shared(Arc::new(table))
    }

    pub fn with_shared(table: Arc<T>) -> Self {
        Self {
            table,
            state: Mutex::new(StoreState::default()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().snapshot()
    }

    // ============================================================
    // Persisted transitions
    // ============================================================

    /// Load the full collection, replacing whatever is listed.
    ///
    /// On failure the list is left empty. The loading flag is cleared either way.
    pub async fn initialize(&self) -> Result<Outcome, StorageError> {
        let token = self.lock().begin_load();
        tracing::debug!(token, "Loading notes");

        let Some(result) = self.call(self.table.list_all()).await else {
            let mut state = self.lock();
            if state.is_latest_load(token) {
                state.is_loading = false;
            }
            return Ok(Outcome::Cancelled);
        };

        let mut state = self.lock();
        if !state.is_latest_load(token) {
            tracing::debug!(token, "Discarding superseded note list");
            return Ok(Outcome::Discarded);
        }
        state.is_loading = false;

        match result {
            Ok(notes) => {
                tracing::info!(count = notes.len(), "Loaded notes");
                state.replace_all(notes);
                state.last_error = None;
                Ok(Outcome::Applied)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load notes");
                state.notes.clear();
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Create a note from `text`. Blank text is ignored.
    ///
    /// The input buffer is cleared only once the table confirms the create.
    pub async fn add_note(&self, text: &str) -> Result<Outcome, StorageError> {
        let content = text.trim();
        if content.is_empty() {
            tracing::debug!("Ignoring blank note");
            return Ok(Outcome::Skipped);
        }

        let Some(result) = self.call(self.table.create(content)).await else {
            return Ok(Outcome::Cancelled);
        };

        let mut state = self.lock();
        match result {
            Ok(note) => {
                tracing::info!(id = %note.id, "Note created");
                state.insert(note);
                state.input_text.clear();
                state.last_error = None;
                Ok(Outcome::Applied)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create note");
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// [`add_note`](Self::add_note) with the current input buffer.
    pub async fn submit_input(&self) -> Result<Outcome, StorageError> {
        let text = self.lock().input_text.clone();
        self.add_note(&text).await
    }

    /// Delete a note. It stays listed until the table confirms.
    pub async fn delete_note(&self, id: Uuid) -> Result<Outcome, StorageError> {
        // Deletes take no request token; a save in flight still applies if this fails.
        tracing::debug!(%id, "Deleting note");

        let Some(result) = self.call(self.table.delete(id)).await else {
            return Ok(Outcome::Cancelled);
        };

        let mut state = self.lock();
        match result {
            Ok(()) => {
                // Also drops the token of any save still in flight.
                state.remove(id);
                state.last_error = None;
                tracing::info!(%id, "Note deleted");
                Ok(Outcome::Applied)
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Failed to delete note");
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Persist an edit. Blank text is ignored and the note stays in edit mode.
    ///
    /// On success the note takes the table's record, leaves edit mode and
    /// moves to its new position. On failure it stays in edit mode.
    pub async fn save_edit(&self, id: Uuid, text: &str) -> Result<Outcome, StorageError> {
        let content = text.trim();
        if content.is_empty() {
            tracing::debug!(%id, "Ignoring blank edit");
            return Ok(Outcome::Skipped);
        }

        let (token, timestamp) = {
            let mut state = self.lock();
            let now = Utc::now();
            // Never move a note backwards, even if the local clock did.
            let timestamp = state
                .find(id)
                .map_or(now, |existing| now.max(existing.timestamp));
            (state.begin_note_request(id), timestamp)
        };
        tracing::debug!(%id, token, "Saving note");

        let Some(result) = self.call(self.table.update(id, content, timestamp)).await else {
            return Ok(Outcome::Cancelled);
        };

        let mut state = self.lock();
        if !state.is_latest_for(id, token) {
            tracing::debug!(%id, token, "Discarding superseded edit response");
            return Ok(Outcome::Discarded);
        }
        state.settle(id, token);

        match result {
            Ok(mut note) => {
                note.is_editing = false;
                if !state.replace(note) {
                    return Ok(Outcome::Discarded);
                }
                state.last_error = None;
                tracing::info!(%id, "Note updated");
                Ok(Outcome::Applied)
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Failed to update note");
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ============================================================
    // Local transitions
    // ============================================================

    /// Put a note into edit mode. Returns false if it is not listed.
    pub fn start_editing(&self, id: Uuid) -> bool {
        self.lock().set_editing(id, true)
    }

    /// Leave edit mode without saving. Returns false if the note is not listed.
    pub fn cancel_edit(&self, id: Uuid) -> bool {
        self.lock().set_editing(id, false)
    }

    pub fn update_input_text(&self, text: impl Into<String>) {
        self.lock().input_text = text.into();
    }

    /// Stop waiting on every in-flight request. Late responses are ignored.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    async fn call<R>(
        &self,
        request: impl Future<Output = Result<R, StorageError>>,
    ) -> Option<Result<R, StorageError>> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            result = request => Some(result),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("note store lock poisoned")
    }
}
