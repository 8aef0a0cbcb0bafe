use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::server::api::{parse_id, ApiJson, MessageResponse, MAX_LIST_LIMIT};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::store::{NewStudyTask, StudyTask};

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewStudyTask>,
) -> Result<Json<StudyTask>, ApiError> {
    let task = StudyTask::new(input, Utc::now());
    state.store.insert_task(&task).await?;
    tracing::info!(task_id = %task.id, date = %task.date, "Task created");
    Ok(Json(task))
}

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<StudyTask>>, ApiError> {
    Ok(Json(state.store.list_tasks(MAX_LIST_LIMIT).await?))
}

/// PATCH /api/tasks/{id}/complete
pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "Task")?;
    if !state.store.complete_task(id).await? {
        return Err(ApiError::NotFound("Task"));
    }
    Ok(Json(MessageResponse::new("Task completed")))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "Task")?;
    if !state.store.delete_task(id).await? {
        return Err(ApiError::NotFound("Task"));
    }
    Ok(Json(MessageResponse::new("Task deleted")))
}
