//! Study Assistant - AI-assisted study backend with spaced repetition.

pub mod ai;
pub mod config;
pub mod display;
pub mod export;
pub mod scheduler;
pub mod server;
pub mod store;
