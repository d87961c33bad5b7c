use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{NoteTable, StorageError};
use crate::db::{Database, EMPTY_CONTENT_ERROR};
use crate::models::*;

fn storage_error(e: anyhow::Error) -> StorageError {
    let msg = e.to_string();
    if msg == EMPTY_CONTENT_ERROR {
        StorageError::Rejected(msg)
    } else {
        StorageError::Server(msg)
    }
}

#[async_trait]
impl NoteTable for Database {
    async fn list_all(&self) -> Result<Vec<Note>, StorageError> {
        self.list_notes().map_err(storage_error)
    }

    async fn create(&self, content: &str) -> Result<Note, StorageError> {
        self.create_note(CreateNoteInput {
            content: content.to_string(),
        })
        .map_err(storage_error)
    }

    async fn update(
        &self,
        id: Uuid,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Note, StorageError> {
        self.update_note(
            id,
            UpdateNoteInput {
                content: content.to_string(),
                timestamp,
            },
        )
        .map_err(storage_error)?
        .ok_or(StorageError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        if self.delete_note(id).map_err(storage_error)? {
            Ok(())
        } else {
            Err(StorageError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[tokio::test]
    async fn update_of_missing_note_is_not_found() {
        let db = db();
        let id = Uuid::new_v4();
        let err = db.update(id, "text", Utc::now()).await.unwrap_err();
        assert_eq!(err, StorageError::NotFound(id));
    }

    #[tokio::test]
    async fn delete_of_missing_note_is_not_found() {
        let db = db();
        let id = Uuid::new_v4();
        assert_eq!(db.delete(id).await, Err(StorageError::NotFound(id)));
    }

    #[tokio::test]
    async fn blank_content_is_rejected() {
        let db = db();
        let err = db.create("   ").await.unwrap_err();
        assert!(matches!(err, StorageError::Rejected(_)));
    }
}
