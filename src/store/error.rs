//! Store error types.

use std::path::PathBuf;

/// Errors that can occur during store operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Failed to open or create database.
    #[error("Failed to open database at {path}: {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to execute SQL.
    #[error("Database query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Failed to serialize a list column to JSON.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A record failed validation before reaching the database.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Blocking task was cancelled.
    #[error("Blocking task cancelled")]
    TaskCancelled,

    /// Failed to create parent directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_open_display() {
        let err = StoreError::DatabaseOpen {
            path: PathBuf::from("/tmp/study.db"),
            source: rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some("test".to_string()),
            ),
        };
        assert!(err.to_string().contains("Failed to open database"));
        assert!(err.to_string().contains("/tmp/study.db"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = StoreError::InvalidInput("focus_score must be at most 100".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: focus_score must be at most 100"
        );
    }

    #[test]
    fn test_task_cancelled_display() {
        assert_eq!(StoreError::TaskCancelled.to_string(), "Blocking task cancelled");
    }
}
