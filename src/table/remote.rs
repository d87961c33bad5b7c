//! HTTP client for the note table service.
//!
//! Talks to the `/api/v1/notes` routes served by `quicknotes serve`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{NoteTable, StorageError};
use crate::config::AppConfig;
use crate::models::*;

/// Note table backed by a remote `quicknotes serve` instance.
#[derive(Debug, Clone)]
pub struct RemoteTable {
    base_url: String,
    client: Client,
}

impl RemoteTable {
    /// Create a client for the given base URL (e.g. `http://localhost:17020/api/v1`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.server_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        id: Option<Uuid>,
    ) -> Result<T, StorageError> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(transport_error)
        } else {
            Err(status_error(status, response, id).await)
        }
    }

    /// Handle a response whose body is empty on success (204 No Content).
    async fn handle_empty_response(
        &self,
        response: reqwest::Response,
        id: Option<Uuid>,
    ) -> Result<(), StorageError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, response, id).await)
        }
    }
}

async fn status_error(
    status: StatusCode,
    response: reqwest::Response,
    id: Option<Uuid>,
) -> StorageError {
    let body = response.text().await.unwrap_or_default();
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => StorageError::NotFound(id),
        (StatusCode::BAD_REQUEST, _) => StorageError::Rejected(body),
        _ => StorageError::Server(format!("{}: {}", status, body)),
    }
}

fn transport_error(e: reqwest::Error) -> StorageError {
    StorageError::Transport(e.to_string())
}

#[async_trait]
impl NoteTable for RemoteTable {
    async fn list_all(&self) -> Result<Vec<Note>, StorageError> {
        let response = self
            .request(reqwest::Method::GET, "/notes")
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_response(response, None).await
    }

    async fn create(&self, content: &str) -> Result<Note, StorageError> {
        let response = self
            .request(reqwest::Method::POST, "/notes")
            .json(&CreateNoteInput {
                content: content.to_string(),
            })
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_response(response, None).await
    }

    async fn update(
        &self,
        id: Uuid,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Note, StorageError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/notes/{}", id))
            .json(&UpdateNoteInput {
                content: content.to_string(),
                timestamp,
            })
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_response(response, Some(id)).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/notes/{}", id))
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_empty_response(response, Some(id)).await
    }
}
