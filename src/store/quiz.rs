//! Saved quiz questions.

use rusqlite::{params, Row};

use super::db::{sql_limit, string_list_column, uuid_column, Store};
use super::error::StoreError;
use super::models::QuizQuestion;

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<QuizQuestion> {
    Ok(QuizQuestion {
        id: uuid_column(row, 0)?,
        topic: row.get(1)?,
        question: row.get(2)?,
        options: string_list_column(row, 3)?,
        correct_answer: row.get(4)?,
        difficulty: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl Store {
    /// Insert a quiz question.
    ///
    /// # Errors
    ///
    /// Returns an error if the options cannot be serialized or the insert fails.
    pub async fn insert_quiz_question(&self, question: &QuizQuestion) -> Result<(), StoreError> {
        let question = question.clone();
        let options = serde_json::to_string(&question.options)?;
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO quiz_questions (id, topic, question, options, correct_answer, difficulty, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    question.id.to_string(),
                    question.topic,
                    question.question,
                    options,
                    question.correct_answer,
                    question.difficulty,
                    question.created_at
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// List saved quiz questions in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_quiz_questions(&self, limit: usize) -> Result<Vec<QuizQuestion>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, topic, question, options, correct_answer, difficulty, created_at
                 FROM quiz_questions ORDER BY created_at ASC LIMIT ?1",
            )?;
            let questions = stmt
                .query_map(params![sql_limit(limit)], question_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(questions)
        })
        .await
    }
}
