//! In-memory progress registry for polling clients.
//!
//! The cutting endpoints record coarse phase transitions here under a
//! caller-supplied task id. Entries are pruned by age so the map cannot
//! grow without bound.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use vcut_models::{JobPhase, ProgressSnapshot};

/// Entries older than this are dropped on the next write.
const ENTRY_TTL: Duration = Duration::from_secs(3600);

/// Registry of task progress snapshots.
pub struct ProgressRegistry {
    entries: RwLock<HashMap<String, (ProgressSnapshot, Instant)>>,
}

impl Default for ProgressRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Record a phase transition for a task.
    pub async fn record(&self, task_id: &str, status: JobPhase, progress: u8, message: &str) {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, (_, touched)| now.duration_since(*touched) < ENTRY_TTL);

        let entry = entries
            .entry(task_id.to_string())
            .or_insert_with(|| (ProgressSnapshot::pending(task_id), now));
        entry.0.advance(status, progress, message);
        entry.1 = now;
    }

    /// Look up the current snapshot for a task.
    pub async fn snapshot(&self, task_id: &str) -> Option<ProgressSnapshot> {
        self.entries
            .read()
            .await
            .get(task_id)
            .map(|(snapshot, _)| snapshot.clone())
    }
}

/// Placeholder snapshot for tasks the registry has never seen.
///
/// Kept for compatibility with the polling frontend, which derives task
/// ids with `preview`/`cut` prefixes; the values are placeholders, not
/// measurements.
pub fn placeholder_snapshot(task_id: &str) -> ProgressSnapshot {
    let mut snapshot = ProgressSnapshot::pending(task_id);
    if task_id.starts_with("preview") {
        snapshot.advance(JobPhase::Processing, 50, "Analyzing video...");
    } else if task_id.starts_with("cut") {
        snapshot.advance(JobPhase::Processing, 90, "Processing video...");
    }
    snapshot
}
