//! Shared data models for the VideoCut backend.
//!
//! This crate provides Serde-serializable types for:
//! - Artifact roles and filesystem-derived artifact status
//! - Reclamation sweep reports
//! - Progress snapshots for task polling
//! - Preview (dry-run cut) reports

pub mod artifact;
pub mod progress;
pub mod report;

// Re-export common types
pub use artifact::{sanitize_extension, ArtifactRole, ArtifactStatus, RoleParseError, SweepReport};
pub use progress::{JobPhase, ProgressSnapshot};
pub use report::{CutSegment, PreviewReport};
