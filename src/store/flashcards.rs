//! Flashcard persistence and the due-set query.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::db::{sql_limit, uuid_column, Store};
use super::error::StoreError;
use super::models::Flashcard;
use crate::scheduler::Difficulty;

const FLASHCARD_COLUMNS: &str = "id, note_id, question, answer, difficulty, next_review, created_at";

fn flashcard_from_row(row: &Row<'_>) -> rusqlite::Result<Flashcard> {
    let difficulty: i64 = row.get(4)?;
    Ok(Flashcard {
        id: uuid_column(row, 0)?,
        note_id: uuid_column(row, 1)?,
        question: row.get(2)?,
        answer: row.get(3)?,
        difficulty: Difficulty::clamped(difficulty),
        next_review: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl Store {
    /// Insert a flashcard.
    ///
    /// # Errors
    ///
    /// Returns an error if the flashcard cannot be inserted.
    pub async fn insert_flashcard(&self, card: &Flashcard) -> Result<(), StoreError> {
        let card = card.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO flashcards (id, note_id, question, answer, difficulty, next_review, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    card.id.to_string(),
                    card.note_id.to_string(),
                    card.question,
                    card.answer,
                    card.difficulty.get(),
                    card.next_review,
                    card.created_at
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// List flashcards in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_flashcards(&self, limit: usize) -> Result<Vec<Flashcard>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {FLASHCARD_COLUMNS} FROM flashcards ORDER BY created_at ASC LIMIT ?1"
            ))?;
            let cards = stmt
                .query_map(params![sql_limit(limit)], flashcard_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(cards)
        })
        .await
    }

    /// List flashcards whose `next_review` is at or before `now`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn due_flashcards(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Flashcard>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {FLASHCARD_COLUMNS} FROM flashcards
                 WHERE next_review <= ?1 ORDER BY next_review ASC LIMIT ?2"
            ))?;
            let cards = stmt
                .query_map(params![now, sql_limit(limit)], flashcard_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(cards)
        })
        .await
    }

    /// Get a flashcard by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>, StoreError> {
        self.with_conn(move |conn| {
            let card = conn
                .query_row(
                    &format!("SELECT {FLASHCARD_COLUMNS} FROM flashcards WHERE id = ?1"),
                    params![id.to_string()],
                    flashcard_from_row,
                )
                .optional()?;
            Ok(card)
        })
        .await
    }

    /// Overwrite a card's schedule, leaving its other fields unchanged.
    ///
    /// Returns `false` if the card does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_flashcard_schedule(
        &self,
        id: Uuid,
        difficulty: Difficulty,
        next_review: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE flashcards SET difficulty = ?1, next_review = ?2 WHERE id = ?3",
                params![difficulty.get(), next_review, id.to_string()],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    /// Delete a flashcard. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_flashcard(&self, id: Uuid) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "DELETE FROM flashcards WHERE id = ?1",
                params![id.to_string()],
            )?;
            Ok(changed > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::NewFlashcard;
    use chrono::Duration;

    fn card_due_at(next_review: DateTime<Utc>) -> Flashcard {
        Flashcard::new(
            NewFlashcard {
                note_id: Uuid::new_v4(),
                question: "What is ATP?".to_string(),
                answer: "Energy currency of the cell".to_string(),
                difficulty: Difficulty::INITIAL,
                next_review: Some(next_review),
            },
            next_review - Duration::days(1),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get_flashcard() {
        let store = Store::open_in_memory().await.unwrap();
        let card = card_due_at(Utc::now());
        store.insert_flashcard(&card).await.unwrap();

        let fetched = store.get_flashcard(card.id).await.unwrap().unwrap();
        assert_eq!(fetched, card);
    }

    #[tokio::test]
    async fn test_due_query_is_inclusive() {
        let store = Store::open_in_memory().await.unwrap();
        let now = Utc::now();

        let at_now = card_due_at(now);
        let past = card_due_at(now - Duration::hours(3));
        let future = card_due_at(now + Duration::milliseconds(1));
        for card in [&at_now, &past, &future] {
            store.insert_flashcard(card).await.unwrap();
        }

        let due = store.due_flashcards(now, 100).await.unwrap();
        let ids: Vec<Uuid> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![past.id, at_now.id]);
    }

    #[tokio::test]
    async fn test_due_query_respects_limit() {
        let store = Store::open_in_memory().await.unwrap();
        let now = Utc::now();
        for minutes in 1..=5 {
            store
                .insert_flashcard(&card_due_at(now - Duration::minutes(minutes)))
                .await
                .unwrap();
        }
        assert_eq!(store.due_flashcards(now, 3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_schedule_leaves_other_fields() {
        let store = Store::open_in_memory().await.unwrap();
        let card = card_due_at(Utc::now());
        store.insert_flashcard(&card).await.unwrap();

        let next = card.next_review + Duration::days(4);
        let difficulty = Difficulty::new(2).unwrap();
        assert!(store
            .update_flashcard_schedule(card.id, difficulty, next)
            .await
            .unwrap());

        let fetched = store.get_flashcard(card.id).await.unwrap().unwrap();
        assert_eq!(fetched.difficulty, difficulty);
        assert_eq!(fetched.next_review, next);
        assert_eq!(fetched.question, card.question);
        assert_eq!(fetched.answer, card.answer);
        assert_eq!(fetched.note_id, card.note_id);
        assert_eq!(fetched.created_at, card.created_at);
    }

    #[tokio::test]
    async fn test_update_schedule_unknown_card() {
        let store = Store::open_in_memory().await.unwrap();
        let updated = store
            .update_flashcard_schedule(Uuid::new_v4(), Difficulty::INITIAL, Utc::now())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_delete_flashcard() {
        let store = Store::open_in_memory().await.unwrap();
        let card = card_due_at(Utc::now());
        store.insert_flashcard(&card).await.unwrap();

        assert!(store.delete_flashcard(card.id).await.unwrap());
        assert!(!store.delete_flashcard(card.id).await.unwrap());
        assert!(store.list_flashcards(10).await.unwrap().is_empty());
    }
}
