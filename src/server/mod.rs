//! HTTP API for the study assistant.

pub mod api;
mod app;
mod error;
pub mod handlers;
mod state;

pub use app::StudyServer;
pub use error::{ApiError, ServerError};
pub use state::AppState;
