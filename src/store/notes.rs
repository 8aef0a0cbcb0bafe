//! Note persistence.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::db::{sql_limit, uuid_column, Store};
use super::error::StoreError;
use super::models::Note;

const NOTE_COLUMNS: &str = "id, title, content, subject, ai_summary, created_at, updated_at";

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: uuid_column(row, 0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        subject: row.get(3)?,
        ai_summary: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl Store {
    /// Insert a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be inserted.
    pub async fn insert_note(&self, note: &Note) -> Result<(), StoreError> {
        let note = note.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO notes (id, title, content, subject, ai_summary, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    note.id.to_string(),
                    note.title,
                    note.content,
                    note.subject,
                    note.ai_summary,
                    note.created_at,
                    note.updated_at
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// List notes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_notes(&self, limit: usize) -> Result<Vec<Note>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC LIMIT ?1"
            ))?;
            let notes = stmt
                .query_map(params![sql_limit(limit)], note_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(notes)
        })
        .await
    }

    /// Get a note by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        self.with_conn(move |conn| {
            let note = conn
                .query_row(
                    &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
                    params![id.to_string()],
                    note_from_row,
                )
                .optional()?;
            Ok(note)
        })
        .await
    }

    /// Store an AI summary on a note. Returns `false` if the note does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn set_note_summary(
        &self,
        id: Uuid,
        summary: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let summary = summary.into();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE notes SET ai_summary = ?1, updated_at = ?2 WHERE id = ?3",
                params![summary, now, id.to_string()],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    /// Delete a note. Its flashcards are left in place.
    ///
    /// Returns `false` if the note does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_note(&self, id: Uuid) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM notes WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::NewNote;
    use chrono::Duration;

    fn sample_note(title: &str, now: DateTime<Utc>) -> Note {
        Note::new(
            NewNote {
                title: title.to_string(),
                content: "Cells are the basic unit of life.".to_string(),
                subject: "Biology".to_string(),
            },
            now,
        )
    }

    #[tokio::test]
    async fn test_insert_and_get_note() {
        let store = Store::open_in_memory().await.unwrap();
        let note = sample_note("Cells", Utc::now());
        store.insert_note(&note).await.unwrap();

        let fetched = store.get_note(note.id).await.unwrap().unwrap();
        assert_eq!(fetched, note);
    }

    #[tokio::test]
    async fn test_get_missing_note() {
        let store = Store::open_in_memory().await.unwrap();
        assert!(store.get_note(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_notes_newest_first() {
        let store = Store::open_in_memory().await.unwrap();
        let now = Utc::now();
        let older = sample_note("Older", now - Duration::hours(1));
        let newer = sample_note("Newer", now);
        store.insert_note(&older).await.unwrap();
        store.insert_note(&newer).await.unwrap();

        let notes = store.list_notes(10).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "Newer");
        assert_eq!(notes[1].title, "Older");

        assert_eq!(store.list_notes(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_note_summary() {
        let store = Store::open_in_memory().await.unwrap();
        let note = sample_note("Cells", Utc::now());
        store.insert_note(&note).await.unwrap();

        let later = note.created_at + Duration::minutes(5);
        assert!(store
            .set_note_summary(note.id, "- cells are units", later)
            .await
            .unwrap());

        let fetched = store.get_note(note.id).await.unwrap().unwrap();
        assert_eq!(fetched.ai_summary.as_deref(), Some("- cells are units"));
        assert_eq!(fetched.updated_at, later);
        assert_eq!(fetched.created_at, note.created_at);

        assert!(!store
            .set_note_summary(Uuid::new_v4(), "x", later)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_note() {
        let store = Store::open_in_memory().await.unwrap();
        let note = sample_note("Cells", Utc::now());
        store.insert_note(&note).await.unwrap();

        assert!(store.delete_note(note.id).await.unwrap());
        assert!(!store.delete_note(note.id).await.unwrap());
        assert!(store.get_note(note.id).await.unwrap().is_none());
    }
}
