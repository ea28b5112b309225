//! Read-back and reclamation handlers over the artifact store.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use vcut_models::{ArtifactStatus, SweepReport};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Content type for a stored artifact, by extension.
fn content_type_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".mp4") || lower.ends_with(".mov") {
        "video/mp4"
    } else if lower.ends_with(".webm") {
        "video/webm"
    } else if lower.ends_with(".mkv") {
        "video/x-matroska"
    } else if lower.ends_with(".wav") {
        "audio/wav"
    } else if lower.ends_with(".json") {
        "application/json"
    } else {
        "application/octet-stream"
    }
}

/// Download a finished video artifact.
///
/// GET /video/{filename}
pub async fn get_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let path = state.store.resolve(&filename)?;

    let bytes = match fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found("Video not found"));
        }
        Err(e) => return Err(ApiError::internal(format!("Failed to read video: {}", e))),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

/// Poll whether a result artifact is ready for download.
///
/// GET /status/{filename}
pub async fn get_status(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<ArtifactStatus>> {
    Ok(Json(state.store.status(&filename).await?))
}

/// Fetch a JSON metadata sidecar as raw text.
///
/// GET /silencio/{filename}
pub async fn get_silence_json(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let path = state.store.resolve(&filename)?;

    let text = match fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found("JSON not found"));
        }
        Err(e) => return Err(ApiError::internal(format!("Failed to read JSON: {}", e))),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(text))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

/// Sweep response.
#[derive(Serialize)]
pub struct SweepResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: SweepReport,
}

/// Reclaim scratch files; retained results survive.
///
/// POST /limpar-temporarios
pub async fn clear_scratch(State(state): State<AppState>) -> ApiResult<Json<SweepResponse>> {
    let report = state.store.sweep().await?;
    info!(removed = report.removed, kept = report.kept, "Manual sweep");
    Ok(Json(SweepResponse {
        message: "Temporary files cleared".to_string(),
        report,
    }))
}

/// Destructive purge of every stored file, results included.
///
/// POST /limpar-todos
pub async fn purge_all(State(state): State<AppState>) -> ApiResult<Json<SweepResponse>> {
    let report = state.store.purge_all().await?;
    info!(removed = report.removed, "Full purge");
    Ok(Json(SweepResponse {
        message: "All files cleared".to_string(),
        report,
    }))
}
