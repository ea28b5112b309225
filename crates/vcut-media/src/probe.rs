//! FFprobe duration lookup.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Duration probes are informational only; never let a slow ffprobe
/// hold up the primary operation.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// FFprobe JSON output format (format section only).
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probe a media file's playback duration in seconds.
pub async fn probe_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let path = path.as_ref();

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let child = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(PROBE_TIMEOUT, child)
        .await
        .map_err(|_| MediaError::Timeout {
            tool: "ffprobe",
            seconds: PROBE_TIMEOUT.as_secs(),
        })??;

    if !output.status.success() {
        return Err(MediaError::tool_failed(
            "ffprobe",
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code(),
        ));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
    Ok(parse_duration(probe.format.duration.as_deref()).unwrap_or(0.0))
}

/// Best-effort duration: `0.0` on missing tool, failure, timeout or
/// non-numeric output.
pub async fn duration_or_zero(path: impl AsRef<Path>) -> f64 {
    match probe_duration(path.as_ref()).await {
        Ok(duration) => duration,
        Err(e) => {
            debug!(path = %path.as_ref().display(), error = %e, "Duration probe unavailable");
            0.0
        }
    }
}

fn parse_duration(s: Option<&str>) -> Option<f64> {
    let value: f64 = s?.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}
