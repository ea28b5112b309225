//! Axum HTTP API server.
//!
//! This crate provides:
//! - Multipart upload endpoints wrapping auto-editor and FFmpeg
//! - Read-back endpoints over the temporary artifact store
//! - In-memory progress tracking for polling clients
//! - CORS, request-id and request-logging middleware

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod progress;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use progress::ProgressRegistry;
pub use routes::create_router;
pub use state::AppState;
