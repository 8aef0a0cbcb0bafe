//! Server and API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::ai::AiError;
use crate::export::ExportError;
use crate::store::StoreError;

/// Errors that stop the server itself.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Server error while serving connections.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Errors returned from request handlers, rendered as `{"error": "..."}`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Referenced record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeded the upload limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// No AI provider is configured.
    #[error("AI provider is not configured")]
    AiUnavailable,

    /// The AI provider failed.
    #[error(transparent)]
    Ai(#[from] AiError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Store(StoreError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::AiUnavailable | Self::Ai(AiError::MissingApiKey(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Ai(AiError::UnsupportedAttachment(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Ai(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
