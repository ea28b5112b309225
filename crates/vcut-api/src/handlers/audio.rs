//! Audio extraction handler.

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tokio::fs;
use tracing::warn;

use vcut_media::{extract_wav_audio, is_video_extension, locate_ffmpeg};
use vcut_models::{sanitize_extension, ArtifactRole};

use crate::error::{ApiError, ApiResult};
use crate::handlers::upload::read_upload;
use crate::state::AppState;

/// Soft-failure payload: the waveform preview is unavailable but the
/// caller can still cut the video, so this ships with HTTP 200.
#[derive(Serialize)]
pub struct AudioUnavailableResponse {
    pub success: bool,
    pub message: String,
    pub can_cut_video: bool,
}

impl AudioUnavailableResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.into(),
            can_cut_video: true,
        })
    }
}

/// Extract a video's audio track as mono 16-bit 44.1 kHz WAV for the
/// waveform display.
///
/// POST /extrair-audio
pub async fn extract_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let upload = read_upload(&mut multipart).await?;

    let ext = sanitize_extension(&upload.filename)
        .ok_or_else(|| ApiError::bad_request("File must be a video"))?;
    if !is_video_extension(&ext) {
        return Err(ApiError::bad_request("File must be a video"));
    }

    // Missing FFmpeg is a soft failure: cutting still works without a
    // waveform preview.
    let Some(ffmpeg) = locate_ffmpeg() else {
        return Ok(AudioUnavailableResponse::new(
            "FFmpeg is not installed. Audio cannot be extracted for the waveform, \
             but the video can still be cut.",
        )
        .into_response());
    };

    let video = state.store.allocate(ArtifactRole::Video, &ext);
    let audio = state.store.allocate(ArtifactRole::Audio, ".wav");

    fs::write(video.path(), &upload.bytes).await.map_err(|e| {
        ApiError::internal(format!("Failed to persist upload: {}", e))
    })?;

    // The scratch input must not outlive this handler, success or not.
    // Exit arms discard synchronously; the guard covers cancellation.
    let input_path = video.path().to_path_buf();
    let _input_guard = scopeguard::guard((), move |_| {
        tokio::spawn(async move {
            if let Err(e) = fs::remove_file(&input_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %input_path.display(), error = %e, "Could not remove scratch input");
                }
            }
        });
    });

    let _permit = state
        .tool_permits
        .acquire()
        .await
        .map_err(|_| ApiError::internal("Tool pool closed"))?;

    if let Err(e) = extract_wav_audio(&ffmpeg, video.path(), audio.path()).await {
        warn!(error = %e, "Audio extraction failed");
        state.store.discard(&video).await;
        state.store.discard(&audio).await;
        return Ok(AudioUnavailableResponse::new(format!(
            "Could not extract audio from this video: {}",
            e
        ))
        .into_response());
    }

    let wav_bytes = match fs::read(audio.path()).await {
        Ok(bytes) => bytes,
        Err(e) => {
            state.store.discard(&video).await;
            state.store.discard(&audio).await;
            return Err(ApiError::internal(format!(
                "Failed to read extracted audio: {}",
                e
            )));
        }
    };

    // Retain the audio artifact and reclaim everything else this
    // request produced.
    state.store.mark_result(&audio);
    if let Err(e) = state.store.sweep().await {
        warn!(error = %e, "Post-extraction sweep failed");
    }

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, wav_bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", audio.name()),
        )
        .body(Body::from(wav_bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
