//! HTTP handlers, grouped by resource.

mod chat;
mod files;
mod flashcards;
mod notes;
mod planning;
mod progress;
mod quiz;
mod tasks;

pub use chat::{chat, chat_history};
pub use files::{analyze_file, detect_mime_type};
pub use flashcards::{
    create_flashcard, delete_flashcard, due_flashcards, generate_flashcards, list_flashcards,
    review_flashcard,
};
pub use notes::{create_note, delete_note, export_note, get_note, list_notes, summarize_note};
pub use planning::{generate_exam, study_plan};
pub use progress::{create_session, get_progress, list_sessions, update_progress};
pub use quiz::{generate_quiz, list_quiz_questions, save_quiz_question};
pub use tasks::{complete_task, create_task, delete_task, list_tasks};

use axum::Json;

use super::api::MessageResponse;

/// GET /api/ - API banner.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("AI Study App API"))
}
