use axum::extract::State;
use axum::Json;

use crate::server::api::{ApiJson, ExamRequest, ExamResponse, StudyPlanRequest, StudyPlanResponse};
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// POST /api/study-plan
pub async fn study_plan(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<StudyPlanRequest>,
) -> Result<Json<StudyPlanResponse>, ApiError> {
    if request.topics.is_empty() {
        return Err(ApiError::BadRequest("topics must not be empty".to_string()));
    }
    let plan = state
        .ai()?
        .suggest_study_plan(&request.topics, &request.exam_date, request.hours_per_day)
        .await?;
    Ok(Json(StudyPlanResponse { plan }))
}

/// POST /api/exam/generate
pub async fn generate_exam(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExamRequest>,
) -> Result<Json<ExamResponse>, ApiError> {
    if request.topics.is_empty() {
        return Err(ApiError::BadRequest("topics must not be empty".to_string()));
    }
    let questions = state
        .ai()?
        .generate_exam_questions(&request.topics, request.question_count)
        .await?;
    Ok(Json(ExamResponse { questions }))
}
