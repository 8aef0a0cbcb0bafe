//! `SQLite`-backed record store for study data.

mod chat;
mod db;
mod error;
mod flashcards;
mod models;
mod notes;
mod progress;
mod quiz;
mod schema;
mod tasks;

pub use db::Store;
pub use error::StoreError;
pub use models::{
    ChatMessage, Flashcard, NewFlashcard, NewNote, NewQuizQuestion, NewStudySession,
    NewStudyTask, Note, ProgressUpdate, QuizQuestion, StudySession, StudyTask, UserProgress,
    MAX_FOCUS_SCORE, MIN_QUIZ_OPTIONS,
};
pub use schema::{SCHEMA, SCHEMA_VERSION};
