//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::artifacts::{clear_scratch, get_silence_json, get_status, get_video, purge_all};
use crate::handlers::audio::extract_audio;
use crate::handlers::cut::{cut_video, preview_cut};
use crate::handlers::health::test;
use crate::handlers::progress::get_progress;
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
///
/// Route paths are the frontend's contract and are kept verbatim.
pub fn create_router(state: AppState) -> Router {
    let processing_routes = Router::new()
        .route("/extrair-audio", post(extract_audio))
        .route("/preview", post(preview_cut))
        .route("/cortar", post(cut_video));

    let artifact_routes = Router::new()
        .route("/video/:filename", get(get_video))
        .route("/status/:filename", get(get_status))
        .route("/silencio/:filename", get(get_silence_json))
        .route("/limpar-temporarios", post(clear_scratch))
        .route("/limpar-todos", post(purge_all));

    let misc_routes = Router::new()
        .route("/test", get(test))
        .route("/progress/:task_id", get(get_progress));

    Router::new()
        .merge(processing_routes)
        .merge(artifact_routes)
        .merge(misc_routes)
        // Uploads are whole videos; cap them rather than buffering
        // arbitrarily large bodies. DefaultBodyLimit must be raised too
        // or the multipart extractor stops at axum's 2 MB default.
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
