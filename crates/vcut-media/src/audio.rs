//! Waveform audio extraction via FFmpeg.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Video container extensions accepted for upload (lowercase, no dot).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "flv", "webm"];

/// Check a dot-prefixed or bare extension against the video allow-list.
pub fn is_video_extension(ext: &str) -> bool {
    let ext = ext.trim_start_matches('.');
    VIDEO_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

/// Locate the FFmpeg binary: PATH first, then the `FFMPEG_PATH`
/// environment variable as a documented fallback location.
pub fn locate_ffmpeg() -> Option<PathBuf> {
    if let Ok(path) = which::which("ffmpeg") {
        return Some(path);
    }
    let fallback = PathBuf::from(std::env::var_os("FFMPEG_PATH")?);
    if fallback.is_file() {
        Some(fallback)
    } else {
        None
    }
}

/// Demux a video's audio track into WaveSurfer-compatible WAV:
/// single-channel, 16-bit PCM, 44.1 kHz.
pub async fn extract_wav_audio(
    ffmpeg: impl AsRef<Path>,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    debug!(input = %input.display(), output = %output.display(), "Extracting WAV audio");

    let result = Command::new(ffmpeg.as_ref())
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(["-vn", "-acodec", "pcm_s16le", "-ar", "44100", "-ac", "1"])
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    if !result.status.success() {
        return Err(MediaError::tool_failed(
            "ffmpeg",
            String::from_utf8_lossy(&result.stderr).to_string(),
            result.status.code(),
        ));
    }

    if !output.exists() {
        return Err(MediaError::OutputMissing(output.to_path_buf()));
    }

    Ok(())
}
