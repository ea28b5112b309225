//! Artifact roles and status reported by the temporary artifact store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Logical role of a file inside the shared scratch directory.
///
/// The role becomes the filename prefix, so directory listings stay
/// readable even though the rest of the name is a random identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    /// Uploaded source video awaiting processing
    Video,
    /// Extracted waveform audio
    Audio,
    /// Scratch input/output of a dry-run analysis
    Preview,
    /// Finished cut video handed back to the caller
    Output,
    /// JSON metadata sidecar
    Json,
}

impl ArtifactRole {
    /// Filename prefix for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactRole::Video => "video",
            ArtifactRole::Audio => "audio",
            ArtifactRole::Preview => "preview",
            ArtifactRole::Output => "output",
            ArtifactRole::Json => "json",
        }
    }
}

impl std::fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Error)]
#[error("unknown artifact role: {0}")]
pub struct RoleParseError(pub String);

impl std::str::FromStr for ArtifactRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(ArtifactRole::Video),
            "audio" => Ok(ArtifactRole::Audio),
            "preview" => Ok(ArtifactRole::Preview),
            "output" => Ok(ArtifactRole::Output),
            "json" => Ok(ArtifactRole::Json),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Filesystem-derived readiness of a named artifact.
///
/// There is no persisted state: readiness is existence plus non-zero
/// size at the moment of the lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactStatus {
    /// File exists and has non-zero size
    pub ready: bool,
    /// The queried base filename
    pub filename: String,
    /// Size in bytes (0 when missing)
    pub size: u64,
    /// Whether the file exists at all
    pub exists: bool,
}

impl ArtifactStatus {
    /// Status for a filename that does not exist on disk.
    pub fn missing(filename: impl Into<String>) -> Self {
        Self {
            ready: false,
            filename: filename.into(),
            size: 0,
            exists: false,
        }
    }
}

/// Outcome of a reclamation sweep over the shared directory.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SweepReport {
    /// Files deleted
    pub removed: u32,
    /// Files retained (results or explicit keep entries)
    pub kept: u32,
    /// Files that could not be deleted (in use, permissions)
    pub failed: u32,
}

/// Extract a safe, lowercase file extension (with leading dot) from an
/// uploaded filename.
///
/// Client filenames are untrusted, so anything other than short
/// alphanumeric extensions is rejected rather than embedded in a path.
pub fn sanitize_extension(filename: &str) -> Option<String> {
    let ext = std::path::Path::new(filename).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in [
            ArtifactRole::Video,
            ArtifactRole::Audio,
            ArtifactRole::Preview,
            ArtifactRole::Output,
            ArtifactRole::Json,
        ] {
            assert_eq!(ArtifactRole::from_str(role.as_str()).unwrap(), role);
        }
        assert!(ArtifactRole::from_str("thumbnail").is_err());
    }

    #[test]
    fn test_sanitize_extension() {
        assert_eq!(sanitize_extension("clip.MP4").as_deref(), Some(".mp4"));
        assert_eq!(sanitize_extension("a.b.webm").as_deref(), Some(".webm"));
        assert_eq!(sanitize_extension("noext"), None);
        assert_eq!(sanitize_extension("weird.mp4/../../etc"), None);
        assert_eq!(sanitize_extension("dot."), None);
        assert_eq!(sanitize_extension("long.extension1234"), None);
    }

    #[test]
    fn test_status_serializes_expected_fields() {
        let status = ArtifactStatus::missing("output_abc.mp4");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["ready"], false);
        assert_eq!(json["exists"], false);
        assert_eq!(json["size"], 0);
        assert_eq!(json["filename"], "output_abc.mp4");
    }
}
