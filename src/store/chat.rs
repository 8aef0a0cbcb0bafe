//! Tutoring chat history.

use rusqlite::{params, Row};

use super::db::{sql_limit, uuid_column, Store};
use super::error::StoreError;
use super::models::ChatMessage;

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    Ok(ChatMessage {
        id: uuid_column(row, 0)?,
        session_id: row.get(1)?,
        message: row.get(2)?,
        response: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Store {
    /// Insert a chat exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert_chat_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let message = message.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO chat_messages (id, session_id, message, response, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.id.to_string(),
                    message.session_id,
                    message.message,
                    message.response,
                    message.created_at
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Chat history for a session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn chat_history(
        &self,
        session_id: impl Into<String>,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let session_id = session_id.into();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, message, response, created_at
                 FROM chat_messages WHERE session_id = ?1
                 ORDER BY created_at ASC LIMIT ?2",
            )?;
            let messages = stmt
                .query_map(params![session_id, sql_limit(limit)], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(messages)
        })
        .await
    }

    /// The most recent `count` exchanges of a session, returned oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn recent_chat_messages(
        &self,
        session_id: impl Into<String>,
        count: usize,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let session_id = session_id.into();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, message, response, created_at
                 FROM chat_messages WHERE session_id = ?1
                 ORDER BY created_at DESC LIMIT ?2",
            )?;
            let mut messages = stmt
                .query_map(params![session_id, sql_limit(count)], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            messages.reverse();
            Ok(messages)
        })
        .await
    }
}
