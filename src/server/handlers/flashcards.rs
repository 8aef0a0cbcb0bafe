use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::scheduler;
use crate::server::api::{
    parse_id, ApiJson, ApiQuery, FlashcardsResponse, GenerateFlashcardsRequest, MessageResponse,
    ReviewQuery, ReviewResponse, MAX_DUE_LIMIT, MAX_LIST_LIMIT,
};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::store::{Flashcard, NewFlashcard};

/// POST /api/flashcards/generate - Ask the model for flashcards from a note.
///
/// The model text is returned unparsed; nothing is stored.
pub async fn generate_flashcards(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GenerateFlashcardsRequest>,
) -> Result<Json<FlashcardsResponse>, ApiError> {
    let note_id = parse_id(&request.note_id, "Note")?;
    let note = state
        .store
        .get_note(note_id)
        .await?
        .ok_or(ApiError::NotFound("Note"))?;

    let flashcards = state
        .ai()?
        .generate_flashcards(&note.content, request.count)
        .await?;
    Ok(Json(FlashcardsResponse { flashcards }))
}

/// POST /api/flashcards - Add a flashcard.
pub async fn create_flashcard(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewFlashcard>,
) -> Result<Json<Flashcard>, ApiError> {
    let card = Flashcard::new(input, Utc::now());
    state.store.insert_flashcard(&card).await?;
    tracing::info!(flashcard_id = %card.id, note_id = %card.note_id, "Flashcard created");
    Ok(Json(card))
}

/// GET /api/flashcards
pub async fn list_flashcards(
    State(state): State<AppState>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    Ok(Json(state.store.list_flashcards(MAX_LIST_LIMIT).await?))
}

/// GET /api/flashcards/due - Cards whose review time has arrived, oldest first.
pub async fn due_flashcards(
    State(state): State<AppState>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    let cards = state.store.due_flashcards(Utc::now(), MAX_DUE_LIMIT).await?;
    Ok(Json(cards))
}

/// PATCH /api/flashcards/{id}/review?correct= - Record a review and reschedule.
pub async fn review_flashcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<ReviewQuery>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let id = parse_id(&id, "Flashcard")?;
    let card = state
        .store
        .get_flashcard(id)
        .await?
        .ok_or(ApiError::NotFound("Flashcard"))?;

    let outcome = scheduler::review(card.difficulty, query.correct, Utc::now());
    let updated = state
        .store
        .update_flashcard_schedule(id, outcome.difficulty, outcome.next_review)
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Flashcard"));
    }

    tracing::info!(
        flashcard_id = %id,
        correct = query.correct,
        difficulty = outcome.difficulty.get(),
        next_review = %outcome.next_review,
        "Flashcard reviewed"
    );

    Ok(Json(ReviewResponse {
        message: "Flashcard reviewed".to_string(),
        next_review: outcome.next_review,
        difficulty: outcome.difficulty,
    }))
}

/// DELETE /api/flashcards/{id}
pub async fn delete_flashcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "Flashcard")?;
    if !state.store.delete_flashcard(id).await? {
        return Err(ApiError::NotFound("Flashcard"));
    }
    tracing::info!(flashcard_id = %id, "Flashcard deleted");
    Ok(Json(MessageResponse::new("Flashcard deleted")))
}
