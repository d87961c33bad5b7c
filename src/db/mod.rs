mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;

/// Error text for blank note content. The API layer reports it as a bad request.
pub const EMPTY_CONTENT_ERROR: &str = "Note content must not be empty";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Note operations
    // ============================================================

    /// All notes, newest first.
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, content, timestamp FROM notes ORDER BY timestamp DESC, rowid DESC",
        )?;

        let notes = stmt
            .query_map([], |row| {
                Ok(Note {
                    id: parse_uuid(0, row.get(0)?)?,
                    content: row.get(1)?,
                    timestamp: parse_datetime(2, row.get(2)?)?,
                    is_editing: false,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, content, timestamp FROM notes WHERE id = ?")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Note {
                id: parse_uuid(0, row.get(0)?)?,
                content: row.get(1)?,
                timestamp: parse_datetime(2, row.get(2)?)?,
                is_editing: false,
            }))
        } else {
            Ok(None)
        }
    }

    /// Insert a note with a fresh id and the current time.
    pub fn create_note(&self, input: CreateNoteInput) -> Result<Note> {
        let content = normalize_content(&input.content)?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now().trunc_subsecs(6);

        conn.execute(
            "INSERT INTO notes (id, content, timestamp) VALUES (?, ?, ?)",
            (id.to_string(), &content, format_datetime(now)),
        )?;

        Ok(Note {
            id,
            content,
            timestamp: now,
            is_editing: false,
        })
    }

    /// Replace content and timestamp. Returns `None` if the note does not exist.
    pub fn update_note(&self, id: Uuid, input: UpdateNoteInput) -> Result<Option<Note>> {
        let content = normalize_content(&input.content)?;
        let timestamp = input.timestamp.trunc_subsecs(6);

        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "UPDATE notes SET content = ?, timestamp = ? WHERE id = ?",
            (&content, format_datetime(timestamp), id.to_string()),
        )?;

        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(Note {
            id,
            content,
            timestamp,
            is_editing: false,
        }))
    }

    pub fn delete_note(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM notes WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// `<data_dir>/quicknotes/quicknotes.db` for the current platform.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "quicknotes")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("quicknotes.db"))
}

fn normalize_content(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        anyhow::bail!(EMPTY_CONTENT_ERROR);
    }
    Ok(trimmed.to_string())
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    // Fixed width so ORDER BY on the text column is chronological.
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_uuid(column: usize, s: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&s).map_err(|e| conversion_error(column, e))
}

fn parse_datetime(column: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

fn conversion_error(
    column: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
}
