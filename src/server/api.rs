//! Request and response types for the HTTP API.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ApiError;
use crate::scheduler::Difficulty;

/// Maximum number of records returned by list endpoints.
pub const MAX_LIST_LIMIT: usize = 1000;

/// Maximum number of cards returned by the due endpoint.
pub const MAX_DUE_LIMIT: usize = 100;

/// Maximum number of messages returned for a chat session.
pub const MAX_CHAT_HISTORY: usize = 100;

/// Number of earlier exchanges sent to the tutor as context.
pub const CHAT_CONTEXT_EXCHANGES: usize = 5;

/// JSON body extractor whose rejections render as [`ApiError::BadRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string extractor whose rejections render as [`ApiError::BadRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait::async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| ApiError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Parse a record id from a path segment. Malformed ids cannot name a
/// record, so they are reported as not found.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if `raw` is not a UUID.
pub fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(entity))
}

/// Generic `{"message": ...}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query for `PATCH /api/flashcards/{id}/review`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReviewQuery {
    pub correct: bool,
}

/// Response for a flashcard review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub message: String,
    pub next_review: DateTime<Utc>,
    pub difficulty: Difficulty,
}

fn default_flashcard_count() -> u32 {
    5
}

/// Body for `POST /api/flashcards/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateFlashcardsRequest {
    pub note_id: String,
    #[serde(default = "default_flashcard_count")]
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardsResponse {
    /// Raw model output.
    pub flashcards: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

fn default_quiz_difficulty() -> String {
    "medium".to_string()
}

fn default_quiz_count() -> u32 {
    5
}

/// Body for `POST /api/quiz/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuizRequest {
    pub topic: String,
    #[serde(default = "default_quiz_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_quiz_count")]
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    /// Raw model output.
    pub quiz: String,
}

/// Body for `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Query for `POST /api/files/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
    pub filename: String,
}

/// Body for `POST /api/study-plan`.
#[derive(Debug, Clone, Deserialize)]
pub struct StudyPlanRequest {
    pub topics: Vec<String>,
    pub exam_date: String,
    pub hours_per_day: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlanResponse {
    pub plan: String,
}

fn default_question_count() -> u32 {
    10
}

/// Body for `POST /api/exam/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamRequest {
    pub topics: Vec<String>,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResponse {
    pub questions: String,
}

/// Query for `GET /api/progress`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}
