//! Task progress polling handler.

use axum::extract::{Path, State};
use axum::Json;

use vcut_models::ProgressSnapshot;

use crate::progress::placeholder_snapshot;
use crate::state::AppState;

/// Poll the progress of a preview/cut task.
///
/// Tasks the registry has seen return real phase transitions; unknown
/// ids fall back to a prefix-derived placeholder snapshot.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Json<ProgressSnapshot> {
    let snapshot = match state.progress.snapshot(&task_id).await {
        Some(snapshot) => snapshot,
        None => placeholder_snapshot(&task_id),
    };
    Json(snapshot)
}
