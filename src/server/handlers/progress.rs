use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::server::api::{ApiJson, ApiQuery, MessageResponse, ProgressQuery, MAX_LIST_LIMIT};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::store::{NewStudySession, ProgressUpdate, StudySession, UserProgress};

/// POST /api/sessions - Log a study session and credit it to the user's progress.
pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewStudySession>,
) -> Result<Json<StudySession>, ApiError> {
    input.validate()?;
    let session = StudySession::new(input, &state.default_user_id, Utc::now());
    state.store.record_study_session(&session).await?;
    tracing::info!(
        session_id = %session.id,
        user_id = %session.user_id,
        minutes = session.duration,
        "Study session recorded"
    );
    Ok(Json(session))
}

/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudySession>>, ApiError> {
    Ok(Json(state.store.list_study_sessions(MAX_LIST_LIMIT).await?))
}

/// GET /api/progress?user_id=
pub async fn get_progress(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProgressQuery>,
) -> Result<Json<UserProgress>, ApiError> {
    let user_id = state.user_id(query.user_id);
    Ok(Json(state.store.get_progress(user_id).await?))
}

/// POST /api/progress/update - Overwrite the supplied progress fields.
pub async fn update_progress(
    State(state): State<AppState>,
    ApiJson(mut update): ApiJson<ProgressUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = state.user_id(update.user_id.take());
    state.store.update_progress(user_id.as_str(), update).await?;
    tracing::info!(user_id = %user_id, "Progress updated");
    Ok(Json(MessageResponse::new("Progress updated")))
}
