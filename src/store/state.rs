use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{sort_newest_first, Note};

/// Read-only view of the store handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    /// Newest first.
    pub notes: Vec<Note>,
    pub is_loading: bool,
    pub input_text: String,
    /// Message of the most recent storage failure, cleared by the next success.
    pub last_error: Option<String>,
}

impl StoreSnapshot {
    /// Loaded and nothing to show: the "no notes yet" screen.
    pub fn is_empty_state(&self) -> bool {
        !self.is_loading && self.notes.is_empty()
    }

    pub fn note(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }
}

/// Mutable state behind the store's lock.
#[derive(Debug, Default)]
pub(super) struct StoreState {
    pub notes: Vec<Note>,
    pub is_loading: bool,
    pub input_text: String,
    pub last_error: Option<String>,
    next_token: u64,
    load_token: u64,
    note_tokens: HashMap<Uuid, u64>,
}

impl StoreState {
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            notes: self.notes.clone(),
            is_loading: self.is_loading,
            input_text: self.input_text.clone(),
            last_error: self.last_error.clone(),
        }
    }

    fn issue(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Start a list load, superseding any load still in flight.
    pub fn begin_load(&mut self) -> u64 {
        let token = self.issue();
        self.load_token = token;
        self.is_loading = true;
        token
    }

    pub fn is_latest_load(&self, token: u64) -> bool {
        self.load_token == token
    }

    /// Start a request against one note, superseding earlier ones for it.
    pub fn begin_note_request(&mut self, id: Uuid) -> u64 {
        let token = self.issue();
        self.note_tokens.insert(id, token);
        token
    }

    pub fn is_latest_for(&self, id: Uuid, token: u64) -> bool {
        self.note_tokens.get(&id) == Some(&token)
    }

    /// Forget the token for `id` if `token` is still the latest one.
    pub fn settle(&mut self, id: Uuid, token: u64) {
        if self.is_latest_for(id, token) {
            self.note_tokens.remove(&id);
        }
    }

    pub fn replace_all(&mut self, mut notes: Vec<Note>) {
        for note in &mut notes {
            note.is_editing = false;
        }
        sort_newest_first(&mut notes);
        self.notes = notes;
    }

    /// Add a freshly created note, keeping newest-first order.
    pub fn insert(&mut self, note: Note) {
        self.notes.retain(|n| n.id != note.id);
        self.notes.insert(0, note);
        sort_newest_first(&mut self.notes);
    }

    /// Swap in the confirmed record for an existing note and re-sort.
    /// Returns false if the note is no longer listed.
    pub fn replace(&mut self, note: Note) -> bool {
        let Some(slot) = self.notes.iter_mut().find(|n| n.id == note.id) else {
            return false;
        };
        *slot = note;
        sort_newest_first(&mut self.notes);
        true
    }

    /// Drop a note and any request still tracked for it.
    pub fn remove(&mut self, id: Uuid) -> bool {
        self.note_tokens.remove(&id);
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    pub fn set_editing(&mut self, id: Uuid, editing: bool) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.is_editing = editing;
                true
            }
            None => false,
        }
    }

    pub fn find(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn note(content: &str, minutes_ago: i64) -> Note {
        Note {
            id: Uuid::new_v4(),
            content: content.to_string(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            is_editing: false,
        }
    }

    #[test]
    fn newer_request_supersedes_older_for_same_note() {
        let mut state = StoreState::default();
        let id = Uuid::new_v4();
        let first = state.begin_note_request(id);
        let second = state.begin_note_request(id);

        assert!(!state.is_latest_for(id, first));
        assert!(state.is_latest_for(id, second));

        state.settle(id, first);
        assert!(state.is_latest_for(id, second));
        state.settle(id, second);
        assert!(!state.is_latest_for(id, second));
    }

    #[test]
    fn tokens_for_different_notes_are_independent() {
        let mut state = StoreState::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let ta = state.begin_note_request(a);
        let tb = state.begin_note_request(b);
        assert!(state.is_latest_for(a, ta));
        assert!(state.is_latest_for(b, tb));
    }

    #[test]
    fn insert_replaces_duplicate_ids() {
        let mut state = StoreState::default();
        let n = note("first", 0);
        state.insert(n.clone());
        state.insert(n);
        assert_eq!(state.notes.len(), 1);
    }

    #[test]
    fn replace_moves_edited_note_to_front() {
        let mut state = StoreState::default();
        state.replace_all(vec![note("a", 1), note("b", 2), note("c", 3)]);
        let mut edited = state.notes[2].clone();
        edited.timestamp = Utc::now();

        assert!(state.replace(edited.clone()));
        assert_eq!(state.notes[0].id, edited.id);
    }

    #[test]
    fn replace_all_clears_editing_flags() {
        let mut state = StoreState::default();
        let mut n = note("a", 0);
        n.is_editing = true;
        state.replace_all(vec![n]);
        assert!(!state.notes[0].is_editing);
    }
}
