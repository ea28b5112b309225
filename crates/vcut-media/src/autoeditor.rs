//! Silence-cut invocation via auto-editor.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Marker auto-editor prints to stderr when the cut would leave nothing.
const EMPTY_TIMELINE_MARKER: &str = "Timeline is empty";

/// Outcome of a silence-cut invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutOutcome {
    /// The tool wrote the declared output file.
    Completed,
    /// Nothing remains after the cut at this threshold. Not an error:
    /// the caller reports a zero-cut result.
    EmptyTimeline,
}

/// Clamp a caller-supplied threshold percentage to [0, 100].
pub fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_finite() {
        threshold.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Strip low-amplitude segments from `input` into `output`.
///
/// The child is spawned with `kill_on_drop`, so dropping the future
/// (client disconnect) terminates the tool, and a timeout bounds how
/// long a single invocation may run.
pub async fn cut_silence(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    threshold_pct: f64,
    timeout: Duration,
) -> MediaResult<CutOutcome> {
    let input = input.as_ref();
    let output = output.as_ref();

    which::which("auto-editor").map_err(|_| MediaError::AutoEditorNotFound)?;

    let threshold = clamp_threshold(threshold_pct);
    debug!(
        input = %input.display(),
        output = %output.display(),
        threshold = threshold,
        "Running auto-editor"
    );

    let child = Command::new("auto-editor")
        .arg(input)
        .arg("--edit")
        .arg(format!("audio:threshold={}%", threshold))
        .arg("--output")
        .arg(output)
        .arg("--no-open")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let result = tokio::time::timeout(timeout, child)
        .await
        .map_err(|_| {
            warn!(input = %input.display(), "auto-editor timed out, killing process");
            MediaError::Timeout {
                tool: "auto-editor",
                seconds: timeout.as_secs(),
            }
        })??;

    let stderr = String::from_utf8_lossy(&result.stderr).to_string();

    if stderr.contains(EMPTY_TIMELINE_MARKER) {
        debug!(input = %input.display(), "auto-editor reported an empty timeline");
        return Ok(CutOutcome::EmptyTimeline);
    }

    if !result.status.success() {
        return Err(MediaError::tool_failed(
            "auto-editor",
            stderr,
            result.status.code(),
        ));
    }

    if !output.exists() {
        return Err(MediaError::OutputMissing(output.to_path_buf()));
    }

    Ok(CutOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_threshold() {
        assert_eq!(clamp_threshold(4.0), 4.0);
        assert_eq!(clamp_threshold(-3.0), 0.0);
        assert_eq!(clamp_threshold(250.0), 100.0);
        assert_eq!(clamp_threshold(f64::NAN), 0.0);
        assert_eq!(clamp_threshold(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_empty_timeline_marker_matches_tool_output() {
        let stderr = "Error! Timeline is empty, nothing to export.";
        assert!(stderr.contains(EMPTY_TIMELINE_MARKER));
    }
}
