//! Study sessions and per-user progress.
//!
//! Progress is keyed by user id. Logging a session credits hours and XP with
//! a single upsert, so concurrent sessions never lose increments.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::db::{sql_limit, string_list_column, uuid_column, Store};
use super::error::StoreError;
use super::models::{ProgressUpdate, StudySession, UserProgress};

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<StudySession> {
    Ok(StudySession {
        id: uuid_column(row, 0)?,
        user_id: row.get(1)?,
        subject: row.get(2)?,
        duration: row.get(3)?,
        date: row.get(4)?,
        focus_score: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<UserProgress> {
    Ok(UserProgress {
        user_id: row.get(0)?,
        total_study_hours: row.get(1)?,
        total_notes: row.get(2)?,
        total_flashcards: row.get(3)?,
        total_quizzes: row.get(4)?,
        streak_days: row.get(5)?,
        xp: row.get(6)?,
        badges: string_list_column(row, 7)?,
        last_study_date: row.get(8)?,
    })
}

fn ensure_progress_row(conn: &Connection, user_id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO user_progress (user_id) VALUES (?1)",
        params![user_id],
    )?;
    Ok(())
}

fn select_progress(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<UserProgress>> {
    conn.query_row(
        "SELECT user_id, total_study_hours, total_notes, total_flashcards, total_quizzes,
                streak_days, xp, badges, last_study_date
         FROM user_progress WHERE user_id = ?1",
        params![user_id],
        progress_from_row,
    )
    .optional()
}

impl Store {
    /// Record a study session and credit its time to the user's progress.
    ///
    /// Both writes happen in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails.
    pub async fn record_study_session(&self, session: &StudySession) -> Result<(), StoreError> {
        let session = session.clone();
        self.with_conn(move |conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "INSERT INTO study_sessions (id, user_id, subject, duration, date, focus_score, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session.id.to_string(),
                    session.user_id,
                    session.subject,
                    session.duration,
                    session.date,
                    session.focus_score,
                    session.created_at
                ],
            )?;
            tx.execute(
                "INSERT INTO user_progress (user_id, total_study_hours, xp, last_study_date)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                     total_study_hours = total_study_hours + excluded.total_study_hours,
                     xp = xp + excluded.xp,
                     last_study_date = excluded.last_study_date",
                params![
                    session.user_id,
                    session.study_hours(),
                    session.xp(),
                    session.date
                ],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    /// List study sessions in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_study_sessions(&self, limit: usize) -> Result<Vec<StudySession>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, subject, duration, date, focus_score, created_at
                 FROM study_sessions ORDER BY created_at ASC LIMIT ?1",
            )?;
            let sessions = stmt
                .query_map(params![sql_limit(limit)], session_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(sessions)
        })
        .await
    }

    /// Get a user's progress, creating an empty record on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_progress(&self, user_id: impl Into<String>) -> Result<UserProgress, StoreError> {
        let user_id = user_id.into();
        self.with_conn(move |conn| {
            ensure_progress_row(conn, &user_id)?;
            let progress = select_progress(conn, &user_id)?;
            Ok(progress.unwrap_or_else(|| UserProgress::new(user_id)))
        })
        .await
    }

    /// Overwrite the fields present in `update` for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the badge list cannot be serialized or the update fails.
    pub async fn update_progress(
        &self,
        user_id: impl Into<String>,
        update: ProgressUpdate,
    ) -> Result<UserProgress, StoreError> {
        let user_id = user_id.into();
        let badges = update
            .badges
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.with_conn(move |conn| {
            let tx = conn.unchecked_transaction()?;
            ensure_progress_row(&tx, &user_id)?;
            tx.execute(
                "UPDATE user_progress SET
                     total_study_hours = COALESCE(?2, total_study_hours),
                     total_notes = COALESCE(?3, total_notes),
                     total_flashcards = COALESCE(?4, total_flashcards),
                     total_quizzes = COALESCE(?5, total_quizzes),
                     streak_days = COALESCE(?6, streak_days),
                     xp = COALESCE(?7, xp),
                     badges = COALESCE(?8, badges),
                     last_study_date = COALESCE(?9, last_study_date)
                 WHERE user_id = ?1",
                params![
                    user_id,
                    update.total_study_hours,
                    update.total_notes,
                    update.total_flashcards,
                    update.total_quizzes,
                    update.streak_days,
                    update.xp,
                    badges,
                    update.last_study_date
                ],
            )?;
            let progress = select_progress(&tx, &user_id)?;
            tx.commit()?;
            Ok(progress.unwrap_or_else(|| UserProgress::new(user_id)))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::NewStudySession;
    use chrono::Utc;

    fn session(user: Option<&str>, duration: u32, date: &str) -> StudySession {
        StudySession::new(
            NewStudySession {
                user_id: user.map(String::from),
                subject: "Physics".to_string(),
                duration,
                date: date.to_string(),
                focus_score: 70,
            },
            "default",
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_progress_created_empty() {
        let store = Store::open_in_memory().await.unwrap();
        let progress = store.get_progress("alice").await.unwrap();
        assert_eq!(progress, UserProgress::new("alice"));
    }

    #[tokio::test]
    async fn test_sessions_accumulate_progress() {
        let store = Store::open_in_memory().await.unwrap();
        store
            .record_study_session(&session(None, 30, "2024-03-01"))
            .await
            .unwrap();
        store
            .record_study_session(&session(None, 90, "2024-03-02"))
            .await
            .unwrap();

        let progress = store.get_progress("default").await.unwrap();
        assert!((progress.total_study_hours - 2.0).abs() < 1e-9);
        assert_eq!(progress.xp, 120);
        assert_eq!(progress.last_study_date.as_deref(), Some("2024-03-02"));

        assert_eq!(store.list_study_sessions(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_progress_is_keyed_by_user() {
        let store = Store::open_in_memory().await.unwrap();
        store
            .record_study_session(&session(Some("alice"), 60, "2024-03-01"))
            .await
            .unwrap();
        store
            .record_study_session(&session(Some("bob"), 15, "2024-03-01"))
            .await
            .unwrap();

        assert_eq!(store.get_progress("alice").await.unwrap().xp, 60);
        assert_eq!(store.get_progress("bob").await.unwrap().xp, 15);
        assert_eq!(store.get_progress("default").await.unwrap().xp, 0);
    }

    #[tokio::test]
    async fn test_concurrent_sessions_do_not_lose_increments() {
        let store = Store::open_in_memory().await.unwrap();
        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .record_study_session(&session(None, 6, "2024-03-01"))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let progress = store.get_progress("default").await.unwrap();
        assert_eq!(progress.xp, 60);
        assert!((progress.total_study_hours - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_progress_partial() {
        let store = Store::open_in_memory().await.unwrap();
        store
            .record_study_session(&session(None, 30, "2024-03-01"))
            .await
            .unwrap();

        let updated = store
            .update_progress(
                "default",
                ProgressUpdate {
                    streak_days: Some(4),
                    badges: Some(vec!["early-bird".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.streak_days, 4);
        assert_eq!(updated.badges, vec!["early-bird".to_string()]);
        assert_eq!(updated.xp, 30);
        assert_eq!(updated.last_study_date.as_deref(), Some("2024-03-01"));
    }
}
