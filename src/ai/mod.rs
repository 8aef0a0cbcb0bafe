//! AI client module for the study tools.

mod client;
pub mod prompts;

pub use client::*;
pub use prompts::DEFAULT_DOCUMENT_QUERY;
