//! Study planner tasks.

use rusqlite::{params, Row};
use uuid::Uuid;

use super::db::{sql_limit, uuid_column, Store};
use super::error::StoreError;
use super::models::StudyTask;

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<StudyTask> {
    Ok(StudyTask {
        id: uuid_column(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        duration: row.get(4)?,
        completed: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl Store {
    /// Insert a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be inserted.
    pub async fn insert_task(&self, task: &StudyTask) -> Result<(), StoreError> {
        let task = task.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO tasks (id, title, description, date, duration, completed, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    task.id.to_string(),
                    task.title,
                    task.description,
                    task.date,
                    task.duration,
                    task.completed,
                    task.created_at
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// List tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_tasks(&self, limit: usize) -> Result<Vec<StudyTask>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, date, duration, completed, created_at
                 FROM tasks ORDER BY created_at ASC LIMIT ?1",
            )?;
            let tasks = stmt
                .query_map(params![sql_limit(limit)], task_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
        .await
    }

    /// Mark a task completed. Returns `false` if the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn complete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE tasks SET completed = 1 WHERE id = ?1",
                params![id.to_string()],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    /// Delete a task. Returns `false` if the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
        .await
    }
}
