use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::export::{export_filename, note_to_pdf};
use crate::server::api::{parse_id, ApiJson, MessageResponse, SummaryResponse, MAX_LIST_LIMIT};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::store::{NewNote, Note};

/// POST /api/notes - Create a note.
pub async fn create_note(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewNote>,
) -> Result<Json<Note>, ApiError> {
    let note = Note::new(input, Utc::now());
    state.store.insert_note(&note).await?;
    tracing::info!(note_id = %note.id, subject = %note.subject, "Note created");
    Ok(Json(note))
}

/// GET /api/notes - List notes, newest first.
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.store.list_notes(MAX_LIST_LIMIT).await?))
}

/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id, "Note")?;
    let note = state
        .store
        .get_note(id)
        .await?
        .ok_or(ApiError::NotFound("Note"))?;
    Ok(Json(note))
}

/// DELETE /api/notes/{id} - Delete a note. Its flashcards are kept.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "Note")?;
    if !state.store.delete_note(id).await? {
        return Err(ApiError::NotFound("Note"));
    }
    tracing::info!(note_id = %id, "Note deleted");
    Ok(Json(MessageResponse::new("Note deleted")))
}

/// POST /api/notes/{id}/summarize - Summarize a note and store the summary on it.
pub async fn summarize_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let id = parse_id(&id, "Note")?;
    let note = state
        .store
        .get_note(id)
        .await?
        .ok_or(ApiError::NotFound("Note"))?;

    let summary = state.ai()?.summarize(&note.content).await?;
    if !state.store.set_note_summary(id, summary.as_str(), Utc::now()).await? {
        return Err(ApiError::NotFound("Note"));
    }

    tracing::info!(note_id = %id, "Note summarized");
    Ok(Json(SummaryResponse { summary }))
}

/// GET /api/notes/{id}/export - Download a note as PDF.
pub async fn export_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "Note")?;
    let note = state
        .store
        .get_note(id)
        .await?
        .ok_or(ApiError::NotFound("Note"))?;

    let pdf = note_to_pdf(&note)?;
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&note.title));
    tracing::debug!(note_id = %id, bytes = pdf.len(), "Note exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}
