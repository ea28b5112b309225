//! Silence-cut handlers: dry-run preview and the real cut.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tokio::fs;
use tracing::{info, warn};

use vcut_media::{
    check_autoeditor, clamp_threshold, cut_silence, duration_or_zero, CutOutcome,
};
use vcut_models::{sanitize_extension, ArtifactRole, JobPhase, PreviewReport};
use vcut_store::ArtifactHandle;

use crate::error::{ApiError, ApiResult};
use crate::handlers::upload::{read_upload, require_threshold, UploadForm};
use crate::state::AppState;

/// Response of the cut endpoint. The JSON sidecar slot is kept for the
/// frontend contract; no sidecar is produced by the audio-threshold edit.
#[derive(Serialize)]
pub struct CutResponse {
    pub video_filename: String,
    pub json_filename: Option<String>,
}

/// Backstop removal of a scratch artifact if the handler future is
/// dropped mid-flight (client disconnect). Normal exit arms discard
/// their scratch synchronously before returning; this only catches
/// cancellation, where nothing after the await point runs.
fn discard_on_exit(handle: &ArtifactHandle) -> scopeguard::ScopeGuard<(), impl FnOnce(())> {
    let path = handle.path().to_path_buf();
    scopeguard::guard((), move |_| {
        tokio::spawn(async move {
            if let Err(e) = fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Could not remove scratch file");
                }
            }
        });
    })
}

async fn record_progress(state: &AppState, form: &UploadForm, phase: JobPhase, pct: u8, msg: &str) {
    if let Some(task_id) = &form.task_id {
        state.progress.record(task_id, phase, pct, msg).await;
    }
}

/// Dry-run analysis: run the cut, discard the output, report measured
/// durations.
///
/// POST /preview
pub async fn preview_cut(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<PreviewReport>> {
    // auto-editor missing is a hard error here: analysis is the
    // service's core function.
    check_autoeditor()?;

    let upload = read_upload(&mut multipart).await?;
    let threshold = clamp_threshold(require_threshold(&upload)?);
    let ext = sanitize_extension(&upload.filename)
        .ok_or_else(|| ApiError::bad_request("File must have a recognizable extension"))?;

    let input = state.store.allocate(ArtifactRole::Preview, &ext);
    let output = state.store.allocate(ArtifactRole::Preview, &ext);

    fs::write(input.path(), &upload.bytes)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to persist upload: {}", e)))?;

    // Both files are scratch in a preview; neither outlives the
    // handler. Guards cover cancellation only, the exit arms below
    // discard synchronously.
    let _input_guard = discard_on_exit(&input);
    let _output_guard = discard_on_exit(&output);

    record_progress(&state, &upload, JobPhase::Processing, 50, "Analyzing video...").await;

    let _permit = state
        .tool_permits
        .acquire()
        .await
        .map_err(|_| ApiError::internal("Tool pool closed"))?;

    let outcome = match cut_silence(input.path(), output.path(), threshold, state.config.tool_timeout).await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            record_progress(&state, &upload, JobPhase::Failed, 100, "Analysis failed").await;
            state.store.discard(&input).await;
            state.store.discard(&output).await;
            return Err(e.into());
        }
    };

    let report = match outcome {
        CutOutcome::EmptyTimeline => {
            let total = duration_or_zero(input.path()).await;
            PreviewReport::empty_timeline(total, threshold)
        }
        CutOutcome::Completed => {
            let total = duration_or_zero(input.path()).await;
            let kept = duration_or_zero(output.path()).await;
            PreviewReport::from_durations(total, kept, threshold)
        }
    };

    state.store.discard(&input).await;
    state.store.discard(&output).await;

    record_progress(&state, &upload, JobPhase::Completed, 100, "Analysis complete").await;
    info!(
        threshold = threshold,
        total_duration = report.total_duration,
        cut_time = report.cut_time,
        "Preview analysis finished"
    );

    Ok(Json(report))
}

/// Cut silent sections out of the uploaded video and retain the result
/// for download.
///
/// POST /cortar
pub async fn cut_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<CutResponse>> {
    check_autoeditor()?;

    let upload = read_upload(&mut multipart).await?;
    let threshold = clamp_threshold(require_threshold(&upload)?);
    let ext = sanitize_extension(&upload.filename)
        .ok_or_else(|| ApiError::bad_request("File must have a recognizable extension"))?;

    let input = state.store.allocate(ArtifactRole::Video, &ext);
    let output = state.store.allocate(ArtifactRole::Output, &ext);

    fs::write(input.path(), &upload.bytes)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to persist upload: {}", e)))?;

    // The scratch input is removed on every exit path: the exit arms
    // below discard it synchronously (sweep covers the success path),
    // the guard covers cancellation. The output is retained only after
    // the tool succeeds.
    let _input_guard = discard_on_exit(&input);

    record_progress(&state, &upload, JobPhase::Processing, 90, "Processing video...").await;

    let _permit = state
        .tool_permits
        .acquire()
        .await
        .map_err(|_| ApiError::internal("Tool pool closed"))?;

    let outcome = match cut_silence(input.path(), output.path(), threshold, state.config.tool_timeout).await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            record_progress(&state, &upload, JobPhase::Failed, 100, "Cut failed").await;
            state.store.discard(&input).await;
            state.store.discard(&output).await;
            return Err(e.into());
        }
    };

    if outcome == CutOutcome::EmptyTimeline {
        // Nothing left after the cut: there is no output video to hand
        // back, so report it as an unprocessable request, not a crash.
        record_progress(&state, &upload, JobPhase::Completed, 100, "Nothing to cut").await;
        state.store.discard(&input).await;
        state.store.discard(&output).await;
        return Err(ApiError::bad_request(format!(
            "Nothing to cut at threshold {}%: the result would be empty",
            threshold
        )));
    }

    state.store.mark_result(&output);
    if let Err(e) = state.store.sweep().await {
        warn!(error = %e, "Post-cut sweep failed");
    }

    record_progress(&state, &upload, JobPhase::Completed, 100, "Video ready").await;
    info!(output = %output.name(), threshold = threshold, "Cut finished");

    Ok(Json(CutResponse {
        video_filename: output.name().to_string(),
        json_filename: None,
    }))
}
