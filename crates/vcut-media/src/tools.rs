//! Tool discovery and startup availability checks.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::audio::locate_ffmpeg;
use crate::error::{MediaError, MediaResult};

/// Check if auto-editor is available.
pub fn check_autoeditor() -> MediaResult<PathBuf> {
    which::which("auto-editor").map_err(|_| MediaError::AutoEditorNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

/// Log which external tools are reachable. Absence degrades
/// functionality per endpoint; it never aborts startup.
pub fn log_tool_availability() {
    match check_autoeditor() {
        Ok(path) => info!("auto-editor found at {}", path.display()),
        Err(_) => warn!("auto-editor not found in PATH; cutting endpoints will fail"),
    }
    match locate_ffmpeg() {
        Some(path) => info!("FFmpeg found at {}", path.display()),
        None => warn!("FFmpeg not found; audio extraction will be unavailable"),
    }
    if check_ffprobe().is_err() {
        warn!("FFprobe not found; durations will be reported as 0.0");
    }
}
