use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::server::api::{ApiJson, GenerateQuizRequest, QuizResponse, MAX_LIST_LIMIT};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::store::{NewQuizQuestion, QuizQuestion};

/// POST /api/quiz/generate - Ask the model for multiple choice questions.
pub async fn generate_quiz(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GenerateQuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = state
        .ai()?
        .generate_quiz(&request.topic, &request.difficulty, request.count)
        .await?;
    Ok(Json(QuizResponse { quiz }))
}

/// POST /api/quiz/questions - Save a question after checking its answer index.
pub async fn save_quiz_question(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewQuizQuestion>,
) -> Result<Json<QuizQuestion>, ApiError> {
    input.validate()?;
    let question = QuizQuestion::new(input, Utc::now());
    state.store.insert_quiz_question(&question).await?;
    tracing::info!(question_id = %question.id, topic = %question.topic, "Quiz question saved");
    Ok(Json(question))
}

/// GET /api/quiz/questions
pub async fn list_quiz_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizQuestion>>, ApiError> {
    Ok(Json(state.store.list_quiz_questions(MAX_LIST_LIMIT).await?))
}
