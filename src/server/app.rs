//! HTTP server with axum router and graceful shutdown.

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ServerError;
use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;

/// HTTP server for the study API.
pub struct StudyServer {
    /// Server configuration.
    config: ServerConfig,
    /// Application state shared across handlers.
    state: AppState,
}

impl StudyServer {
    /// Create a new server with default configuration.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            config: ServerConfig::default(),
            state,
        }
    }

    /// Set the server configuration (builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configured address as a string.
    #[must_use]
    pub fn address(&self) -> String {
        self.config.address()
    }

    fn cors_layer(&self) -> CorsLayer {
        if self.config.cors_permissive() {
            return CorsLayer::permissive();
        }

        let origins: Vec<HeaderValue> = self
            .config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }

    /// Build the axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/api", get(handlers::root))
            .route("/api/", get(handlers::root))
            .route(
                "/api/notes",
                get(handlers::list_notes).post(handlers::create_note),
            )
            .route(
                "/api/notes/:id",
                get(handlers::get_note).delete(handlers::delete_note),
            )
            .route("/api/notes/:id/summarize", post(handlers::summarize_note))
            .route("/api/notes/:id/export", get(handlers::export_note))
            .route(
                "/api/flashcards/generate",
                post(handlers::generate_flashcards),
            )
            .route(
                "/api/flashcards",
                get(handlers::list_flashcards).post(handlers::create_flashcard),
            )
            .route("/api/flashcards/due", get(handlers::due_flashcards))
            .route(
                "/api/flashcards/:id/review",
                patch(handlers::review_flashcard),
            )
            .route(
                "/api/flashcards/:id",
                axum::routing::delete(handlers::delete_flashcard),
            )
            .route(
                "/api/tasks",
                get(handlers::list_tasks).post(handlers::create_task),
            )
            .route("/api/tasks/:id/complete", patch(handlers::complete_task))
            .route("/api/tasks/:id", axum::routing::delete(handlers::delete_task))
            .route("/api/quiz/generate", post(handlers::generate_quiz))
            .route(
                "/api/quiz/questions",
                get(handlers::list_quiz_questions).post(handlers::save_quiz_question),
            )
            .route("/api/chat", post(handlers::chat))
            .route("/api/chat/history/:session_id", get(handlers::chat_history))
            .route("/api/files/analyze", post(handlers::analyze_file))
            .route("/api/study-plan", post(handlers::study_plan))
            .route("/api/exam/generate", post(handlers::generate_exam))
            .route(
                "/api/sessions",
                get(handlers::list_sessions).post(handlers::create_session),
            )
            .route("/api/progress", get(handlers::get_progress))
            .route("/api/progress/update", post(handlers::update_progress))
            .with_state(self.state.clone())
            .layer(DefaultBodyLimit::max(self.config.max_upload_bytes))
            .layer(TraceLayer::new_for_http())
            .layer(self.cors_layer())
    }

    /// Serve on an already bound listener until the cancellation token fires.
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let cancel = self.state.cancel.clone();
        let app = self.build_router();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
                tracing::info!("Server shutting down gracefully");
            })
            .await
            .map_err(ServerError::Serve)
    }

    /// Run the server, binding to the configured address.
    ///
    /// The server will run until the cancellation token is triggered,
    /// at which point it will perform a graceful shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or serve.
    pub async fn run(self) -> Result<(), ServerError> {
        let address = self.address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::BindError {
                address: address.clone(),
                source,
            })?;

        tracing::info!(address = %address, "Starting study server");
        self.serve(listener).await
    }
}
