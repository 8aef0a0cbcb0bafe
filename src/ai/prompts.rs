//! Prompts for the study tools.

use crate::store::ChatMessage;

/// System prompt for note summaries.
pub const SUMMARIZE_SYSTEM_PROMPT: &str =
    "You are a helpful study assistant. Provide concise, clear summaries of study materials.";

/// System prompt for flashcard generation.
pub const FLASHCARD_SYSTEM_PROMPT: &str = "You are a helpful study assistant. Generate flashcard questions and answers from study material.";

/// System prompt for the tutoring chat.
pub const TUTOR_SYSTEM_PROMPT: &str =
    "You are a helpful tutor. Answer student questions clearly and provide examples when needed.";

/// System prompt for document analysis.
pub const DOCUMENT_SYSTEM_PROMPT: &str =
    "You are a document analysis assistant. Analyze documents and provide insights.";

/// System prompt for study plans.
pub const STUDY_PLAN_SYSTEM_PROMPT: &str =
    "You are a study planning assistant. Create realistic, achievable study schedules.";

/// System prompt for exam practice questions.
pub const EXAM_SYSTEM_PROMPT: &str =
    "You are an exam creator. Generate realistic exam questions with detailed solutions.";

/// Query used when a document is uploaded without one.
pub const DEFAULT_DOCUMENT_QUERY: &str = "Summarize this document";

#[must_use]
pub fn format_summarize(text: &str) -> String {
    format!("Summarize the following text in bullet points:\n\n{text}")
}

#[must_use]
pub fn format_flashcards(text: &str, count: u32) -> String {
    format!(
        "Generate {count} flashcards (question and answer pairs) from this text. \
         Return as JSON array with 'question' and 'answer' fields:\n\n{text}"
    )
}

/// System prompt for quiz generation at a given difficulty.
#[must_use]
pub fn quiz_system_prompt(difficulty: &str) -> String {
    format!("You are a quiz generator. Create {difficulty} difficulty multiple choice questions.")
}

#[must_use]
pub fn format_quiz(topic: &str, difficulty: &str, count: u32) -> String {
    format!(
        "Generate {count} {difficulty} difficulty multiple choice questions about: {topic}. \
         Include 4 options and mark the correct answer. Return as JSON array."
    )
}

/// Render earlier exchanges as `Q:`/`A:` pairs, oldest first.
#[must_use]
pub fn format_chat_context(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|msg| format!("Q: {}\nA: {}", msg.message, msg.response))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tutor system prompt with the session's earlier exchanges appended.
#[must_use]
pub fn tutor_system_prompt(history: &[ChatMessage]) -> String {
    if history.is_empty() {
        return TUTOR_SYSTEM_PROMPT.to_string();
    }
    format!(
        "{TUTOR_SYSTEM_PROMPT}\n\nPrevious conversation:\n{}",
        format_chat_context(history)
    )
}

#[must_use]
pub fn format_study_plan(topics: &[String], exam_date: &str, hours_per_day: u32) -> String {
    format!(
        "Create a study plan for these topics: {}. Exam date: {exam_date}. \
         Available study time: {hours_per_day} hours/day. Provide day-by-day breakdown.",
        topics.join(", ")
    )
}

#[must_use]
pub fn format_exam_questions(topics: &[String], question_count: u32) -> String {
    format!(
        "Generate {question_count} exam-style questions covering: {}. \
         Include solutions and explanations.",
        topics.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_tutor_prompt_without_history() {
        assert_eq!(tutor_system_prompt(&[]), TUTOR_SYSTEM_PROMPT);
    }

    #[test]
    fn test_tutor_prompt_with_history() {
        let history = vec![
            ChatMessage::new("s", "What is mitosis?", "Cell division.", Utc::now()),
            ChatMessage::new("s", "And meiosis?", "Division producing gametes.", Utc::now()),
        ];
        let prompt = tutor_system_prompt(&history);
        assert!(prompt.starts_with(TUTOR_SYSTEM_PROMPT));
        assert!(prompt.ends_with(
            "Previous conversation:\nQ: What is mitosis?\nA: Cell division.\nQ: And meiosis?\nA: Division producing gametes."
        ));
    }

    #[test]
    fn test_format_quiz() {
        let prompt = format_quiz("photosynthesis", "hard", 3);
        assert!(prompt.starts_with("Generate 3 hard difficulty multiple choice questions about: photosynthesis."));
        assert_eq!(
            quiz_system_prompt("hard"),
            "You are a quiz generator. Create hard difficulty multiple choice questions."
        );
    }

    #[test]
    fn test_format_study_plan_joins_topics() {
        let topics = vec!["Algebra".to_string(), "Geometry".to_string()];
        let prompt = format_study_plan(&topics, "2024-06-01", 2);
        assert!(prompt.contains("Algebra, Geometry"));
        assert!(prompt.contains("Exam date: 2024-06-01"));
        assert!(prompt.contains("2 hours/day"));
    }

    #[test]
    fn test_format_flashcards_includes_text() {
        let prompt = format_flashcards("Water boils at 100C.", 5);
        assert!(prompt.starts_with("Generate 5 flashcards"));
        assert!(prompt.ends_with("\n\nWater boils at 100C."));
    }
}
