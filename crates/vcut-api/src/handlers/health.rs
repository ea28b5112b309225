//! Liveness handler.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Liveness response.
#[derive(Serialize)]
pub struct TestResponse {
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

/// Liveness marker the frontend pings on startup.
pub async fn test() -> Json<TestResponse> {
    Json(TestResponse {
        message: "Backend up and running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
