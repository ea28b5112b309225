//! Progress snapshots for task polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a tracked task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    /// Task not yet started (or unknown to the registry)
    #[default]
    Pending,
    /// External tool is running
    Processing,
    /// Task finished successfully
    Completed,
    /// Task failed
    Failed,
}

impl JobPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPhase::Pending => "pending",
            JobPhase::Processing => "processing",
            JobPhase::Completed => "completed",
            JobPhase::Failed => "failed",
        }
    }
}

/// Snapshot returned by the progress endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Caller-supplied task identifier
    pub task_id: String,
    /// Coarse progress percentage (0-100)
    pub progress: u8,
    /// Human-readable step description
    pub message: String,
    /// Current phase
    pub status: JobPhase,
    /// When this snapshot was last updated
    pub updated_at: DateTime<Utc>,
}

impl ProgressSnapshot {
    /// Fresh pending snapshot.
    pub fn pending(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            progress: 0,
            message: "Waiting to start...".to_string(),
            status: JobPhase::Pending,
            updated_at: Utc::now(),
        }
    }

    /// Move the snapshot to a new phase with a coarse percentage.
    pub fn advance(&mut self, status: JobPhase, progress: u8, message: impl Into<String>) {
        self.status = status;
        self.progress = progress.min(100);
        self.message = message.into();
        self.updated_at = Utc::now();
    }

    /// Whether no further updates are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobPhase::Completed | JobPhase::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_clamps_progress() {
        let mut snap = ProgressSnapshot::pending("cut-1");
        snap.advance(JobPhase::Processing, 150, "Processing video...");
        assert_eq!(snap.progress, 100);
        assert_eq!(snap.status, JobPhase::Processing);
        assert!(!snap.is_terminal());

        snap.advance(JobPhase::Completed, 100, "Done");
        assert!(snap.is_terminal());
    }

    #[test]
    fn test_phase_serializes_snake_case() {
        let json = serde_json::to_value(JobPhase::Processing).unwrap();
        assert_eq!(json, "processing");
    }
}
