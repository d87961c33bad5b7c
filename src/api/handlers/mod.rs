use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::db::{Database, EMPTY_CONTENT_ERROR};
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
///
/// Blank-content validation failures are passed through as BAD_REQUEST;
/// anything else is logged and reported as a generic 500.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = e.to_string();

    if msg == EMPTY_CONTENT_ERROR {
        tracing::warn!("Validation error: {}", msg);
        return (StatusCode::BAD_REQUEST, msg);
    }

    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Note not found".to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Notes
// ============================================================

pub async fn list_notes(
    State(db): State<Database>,
) -> Result<Json<Vec<Note>>, (StatusCode, String)> {
    db.list_notes().map(Json).map_err(internal_error)
}

pub async fn get_note(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, (StatusCode, String)> {
    db.get_note(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create_note(
    State(db): State<Database>,
    Json(input): Json<CreateNoteInput>,
) -> Result<(StatusCode, Json<Note>), (StatusCode, String)> {
    db.create_note(input)
        .map(|n| (StatusCode::CREATED, Json(n)))
        .map_err(internal_error)
}

pub async fn update_note(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateNoteInput>,
) -> Result<Json<Note>, (StatusCode, String)> {
    db.update_note(id, input)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn delete_note(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_note(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
