use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use crate::server::api::{
    ApiJson, ChatRequest, ChatResponse, CHAT_CONTEXT_EXCHANGES, MAX_CHAT_HISTORY,
};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::store::ChatMessage;

/// POST /api/chat - Answer a question with the session's recent exchanges as
/// context, then store the exchange.
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let ai = state.ai()?;
    let history = state
        .store
        .recent_chat_messages(request.session_id.as_str(), CHAT_CONTEXT_EXCHANGES)
        .await?;

    let response = ai.tutor_chat(&request.message, &history).await?;

    let exchange = ChatMessage::new(
        request.session_id,
        request.message,
        response.as_str(),
        Utc::now(),
    );
    state.store.insert_chat_message(&exchange).await?;
    tracing::debug!(session_id = %exchange.session_id, context = history.len(), "Chat exchange stored");

    Ok(Json(ChatResponse { response }))
}

/// GET /api/chat/history/{session_id} - Exchanges in time order.
pub async fn chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = state
        .store
        .chat_history(session_id, MAX_CHAT_HISTORY)
        .await?;
    Ok(Json(messages))
}
