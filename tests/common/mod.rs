//! Test doubles shared by the integration specs.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quicknotes::models::Note;
use quicknotes::summary::{SummaryError, SummaryGenerator};
use quicknotes::table::{NoteTable, StorageError};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListAll,
    Create,
    Update,
    Delete,
}

/// In-memory note table with scriptable latency and failures.
#[derive(Default)]
pub struct MockTable {
    notes: Mutex<Vec<Note>>,
    calls: Mutex<Vec<Op>>,
    failures: Mutex<HashMap<Op, VecDeque<StorageError>>>,
    delays: Mutex<HashMap<Op, VecDeque<Duration>>>,
}

impl MockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        let table = Self::default();
        *table.notes.lock().unwrap() = notes;
        table
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: Op, err: StorageError) {
        self.failures
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(err);
    }

    /// Delay the next call of `op` by `delay`. Queued per call.
    pub fn delay_next(&self, op: Op, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(delay);
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls().iter().filter(|c| **c == op).count()
    }

    pub fn stored(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    async fn enter(&self, op: Op) -> Result<(), StorageError> {
        self.calls.lock().unwrap().push(op);
        let delay = self
            .delays
            .lock()
            .unwrap()
            .get_mut(&op)
            .and_then(|q| q.pop_front());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self
            .failures
            .lock()
            .unwrap()
            .get_mut(&op)
            .and_then(|q| q.pop_front());
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NoteTable for MockTable {
    async fn list_all(&self) -> Result<Vec<Note>, StorageError> {
        self.enter(Op::ListAll).await?;
        let mut notes = self.stored();
        notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(notes)
    }

    async fn create(&self, content: &str) -> Result<Note, StorageError> {
        self.enter(Op::Create).await?;
        let note = Note {
            id: Uuid::new_v4(),
            content: content.to_string(),
            timestamp: Utc::now(),
            is_editing: false,
        };
        self.notes.lock().unwrap().push(note.clone());
        Ok(note)
    }

    async fn update(
        &self,
        id: Uuid,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Note, StorageError> {
        self.enter(Op::Update).await?;
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StorageError::NotFound(id))?;
        note.content = content.to_string();
        note.timestamp = timestamp;
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        self.enter(Op::Delete).await?;
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }
}

pub fn note(content: &str, minutes_ago: i64) -> Note {
    Note {
        id: Uuid::new_v4(),
        content: content.to_string(),
        timestamp: Utc::now() - chrono::Duration::minutes(minutes_ago),
        is_editing: false,
    }
}

/// Summary generator with a scripted delay and answer per input text.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<HashMap<String, (Duration, Result<String, SummaryError>)>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `content` with `result` after `delay`. Unscripted input fails.
    pub fn respond(self, content: &str, delay: Duration, result: Result<&str, &str>) -> Self {
        let result = result
            .map(str::to_string)
            .map_err(|e| SummaryError(e.to_string()));
        self.responses
            .lock()
            .unwrap()
            .insert(content.to_string(), (delay, result));
        self
    }

    /// Content of every call that reached the generator, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryGenerator for ScriptedGenerator {
    async fn summarize(&self, content: &str) -> Result<String, SummaryError> {
        self.seen.lock().unwrap().push(content.to_string());
        let scripted = self.responses.lock().unwrap().get(content).cloned();
        let (delay, result) = scripted
            .unwrap_or_else(|| (Duration::ZERO, Err(SummaryError("unscripted".into()))));
        tokio::time::sleep(delay).await;
        result
    }
}
