//! Shared application state for request handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::error::ApiError;
use crate::ai::AiClient;
use crate::store::Store;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Record store.
    pub store: Store,
    /// AI client, absent when no API key is configured.
    pub ai: Option<AiClient>,
    /// User id that progress is recorded under when a request names none.
    pub default_user_id: Arc<str>,
    /// Cancellation token for graceful shutdown.
    pub cancel: CancellationToken,
}

impl AppState {
    /// Create new app state without an AI client.
    #[must_use]
    pub fn new(store: Store, default_user_id: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            ai: None,
            default_user_id: default_user_id.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Attach an AI client (builder pattern).
    #[must_use]
    pub fn with_ai(mut self, ai: AiClient) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Use an externally owned cancellation token (builder pattern).
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The AI client, or `ApiError::AiUnavailable` when none is configured.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AiUnavailable` if no client is configured.
    pub fn ai(&self) -> Result<&AiClient, ApiError> {
        self.ai.as_ref().ok_or(ApiError::AiUnavailable)
    }

    /// Resolve an optional user id to the default user.
    #[must_use]
    pub fn user_id(&self, requested: Option<String>) -> String {
        requested
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.default_user_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_without_ai() {
        let store = Store::open_in_memory().await.unwrap();
        let state = AppState::new(store, "default");

        assert!(matches!(state.ai(), Err(ApiError::AiUnavailable)));
        assert!(!state.cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_user_id_fallback() {
        let store = Store::open_in_memory().await.unwrap();
        let state = AppState::new(store, "default");

        assert_eq!(state.user_id(None), "default");
        assert_eq!(state.user_id(Some(String::new())), "default");
        assert_eq!(state.user_id(Some("alice".to_string())), "alice");
    }

    #[tokio::test]
    async fn test_shared_cancel_token() {
        let store = Store::open_in_memory().await.unwrap();
        let cancel = CancellationToken::new();
        let state = AppState::new(store, "default").with_cancel(cancel.clone());

        cancel.cancel();
        assert!(state.cancel.is_cancelled());
    }
}
