//! Record types persisted by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StoreError;
use crate::scheduler::Difficulty;

/// Highest focus score a study session can record.
pub const MAX_FOCUS_SCORE: u8 = 100;

/// Minimum number of options for a multiple choice question.
pub const MIN_QUIZ_OPTIONS: usize = 2;

/// A study note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub subject: String,
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a note.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub subject: String,
}

impl Note {
    /// Build a note from client input, stamped with `now`.
    #[must_use]
    pub fn new(input: NewNote, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            subject: input.subject,
            ai_summary: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A question/answer card scheduled for spaced repetition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    /// Owning note. The note may have been deleted since.
    pub note_id: Uuid,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub next_review: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when adding a flashcard.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFlashcard {
    pub note_id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// First review time; defaults to creation time.
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
}

impl Flashcard {
    /// Build a flashcard from client input, stamped with `now`.
    #[must_use]
    pub fn new(input: NewFlashcard, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            note_id: input.note_id,
            question: input.question,
            answer: input.answer,
            difficulty: input.difficulty,
            next_review: input.next_review.unwrap_or(now),
            created_at: now,
        }
    }
}

/// A planned study task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyTask {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: String,
    /// Planned length in minutes.
    pub duration: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudyTask {
    pub title: String,
    pub description: String,
    pub date: String,
    pub duration: u32,
}

impl StudyTask {
    #[must_use]
    pub fn new(input: NewStudyTask, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            date: input.date,
            duration: input.duration,
            completed: false,
            created_at: now,
        }
    }
}

fn default_quiz_difficulty() -> String {
    "medium".to_string()
}

/// A saved multiple choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub topic: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when saving a quiz question.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuizQuestion {
    pub topic: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default = "default_quiz_difficulty")]
    pub difficulty: String,
}

impl NewQuizQuestion {
    /// Check that the answer index points at one of the options.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidInput` if there are too few options or the
    /// answer index is out of range.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.options.len() < MIN_QUIZ_OPTIONS {
            return Err(StoreError::InvalidInput(format!(
                "a question needs at least {MIN_QUIZ_OPTIONS} options, got {}",
                self.options.len()
            )));
        }
        if self.correct_answer >= self.options.len() {
            return Err(StoreError::InvalidInput(format!(
                "correct_answer {} is out of range for {} options",
                self.correct_answer,
                self.options.len()
            )));
        }
        Ok(())
    }
}

impl QuizQuestion {
    #[must_use]
    pub fn new(input: NewQuizQuestion, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: input.topic,
            question: input.question,
            options: input.options,
            correct_answer: input.correct_answer,
            difficulty: input.difficulty,
            created_at: now,
        }
    }
}

/// One tutoring exchange within a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: String,
    pub message: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        message: impl Into<String>,
        response: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into(),
            message: message.into(),
            response: response.into(),
            created_at: now,
        }
    }
}

/// A completed block of study time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: String,
    pub subject: String,
    /// Length in minutes.
    pub duration: u32,
    pub date: String,
    pub focus_score: u8,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when logging a study session.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudySession {
    /// Falls back to the configured default user.
    #[serde(default)]
    pub user_id: Option<String>,
    pub subject: String,
    pub duration: u32,
    pub date: String,
    #[serde(default)]
    pub focus_score: u8,
}

impl NewStudySession {
    /// # Errors
    ///
    /// Returns `StoreError::InvalidInput` if the focus score exceeds 100.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.focus_score > MAX_FOCUS_SCORE {
            return Err(StoreError::InvalidInput(format!(
                "focus_score must be at most {MAX_FOCUS_SCORE}, got {}",
                self.focus_score
            )));
        }
        Ok(())
    }
}

impl StudySession {
    #[must_use]
    pub fn new(input: NewStudySession, default_user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: input
                .user_id
                .unwrap_or_else(|| default_user_id.to_string()),
            subject: input.subject,
            duration: input.duration,
            date: input.date,
            focus_score: input.focus_score,
            created_at: now,
        }
    }

    /// Hours credited to progress for this session.
    #[must_use]
    pub fn study_hours(&self) -> f64 {
        f64::from(self.duration) / 60.0
    }

    /// Experience points credited for this session, one per minute.
    #[must_use]
    pub fn xp(&self) -> u64 {
        u64::from(self.duration)
    }
}

/// Aggregate study statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: String,
    pub total_study_hours: f64,
    pub total_notes: u64,
    pub total_flashcards: u64,
    pub total_quizzes: u64,
    pub streak_days: u64,
    pub xp: u64,
    pub badges: Vec<String>,
    pub last_study_date: Option<String>,
}

impl UserProgress {
    /// Empty progress for a user.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_study_hours: 0.0,
            total_notes: 0,
            total_flashcards: 0,
            total_quizzes: 0,
            streak_days: 0,
            xp: 0,
            badges: Vec::new(),
            last_study_date: None,
        }
    }
}

/// Partial overwrite of a user's progress. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub user_id: Option<String>,
    pub total_study_hours: Option<f64>,
    pub total_notes: Option<u64>,
    pub total_flashcards: Option<u64>,
    pub total_quizzes: Option<u64>,
    pub streak_days: Option<u64>,
    pub xp: Option<u64>,
    pub badges: Option<Vec<String>>,
    pub last_study_date: Option<String>,
}
