//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur when invoking the external tools.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH (set FFMPEG_PATH to override)")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("auto-editor not found in PATH")]
    AutoEditorNotFound,

    #[error("{tool} failed: {stderr}")]
    ToolFailed {
        tool: &'static str,
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("Tool reported success but output is missing: {0}")]
    OutputMissing(PathBuf),

    #[error("{tool} timed out after {seconds} seconds")]
    Timeout { tool: &'static str, seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a tool failure carrying the tool's raw diagnostic text.
    pub fn tool_failed(tool: &'static str, stderr: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::ToolFailed {
            tool,
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Whether the error means the binary itself is absent from the host.
    pub fn is_tool_missing(&self) -> bool {
        matches!(
            self,
            MediaError::FfmpegNotFound | MediaError::FfprobeNotFound | MediaError::AutoEditorNotFound
        )
    }
}
