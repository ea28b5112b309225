//! The artifact store: naming, retention and reclamation of files in a
//! single flat scratch directory.
//!
//! Concurrency model: handlers run concurrently without locking the
//! directory. Correctness relies on per-allocation unique names; the
//! sweep is the only cross-request mutation and is deliberately
//! best-effort (deleting a file a moment before or after another handler
//! would have read it is an accepted failure mode).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use vcut_models::{ArtifactRole, ArtifactStatus, SweepReport};

use crate::error::{StoreError, StoreResult};

/// Handle to an allocated artifact path.
///
/// Allocation reserves a unique name; nothing exists on disk until the
/// owning handler (or an external tool) writes to the path.
#[derive(Debug, Clone)]
pub struct ArtifactHandle {
    role: ArtifactRole,
    path: PathBuf,
    name: String,
}

impl ArtifactHandle {
    /// Full filesystem path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base filename, which is also the external lookup identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical role the artifact was allocated for.
    pub fn role(&self) -> ArtifactRole {
        self.role
    }
}

/// Store managing one shared scratch directory.
pub struct ArtifactStore {
    root: PathBuf,
    /// Exact filenames that sweeps must retain.
    results: Mutex<HashSet<String>>,
}

impl ArtifactStore {
    /// Open (and create if needed) the shared scratch directory.
    pub async fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            results: Mutex::new(HashSet::new()),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate a collision-free path for `role` with the given
    /// (pre-sanitized, dot-prefixed) extension.
    ///
    /// The embedded UUIDv4 carries 122 bits of randomness, so collisions
    /// across concurrent requests are not a practical concern.
    pub fn allocate(&self, role: ArtifactRole, ext: &str) -> ArtifactHandle {
        let name = format!("{}_{}{}", role.as_str(), Uuid::new_v4(), ext);
        let path = self.root.join(&name);
        debug!(role = %role, name = %name, "Allocated artifact");
        ArtifactHandle { role, path, name }
    }

    /// Mark an artifact as a retained result: reclamation sweeps will
    /// skip it until a destructive purge removes everything.
    ///
    /// Call this only after the file exists on disk; a sweep drops
    /// retention for names whose file is gone.
    pub fn mark_result(&self, handle: &ArtifactHandle) {
        self.results
            .lock()
            .expect("results set poisoned")
            .insert(handle.name.clone());
    }

    /// Best-effort removal of a single artifact. Failures (already gone,
    /// held open by another process) are logged and swallowed.
    pub async fn discard(&self, handle: &ArtifactHandle) {
        match fs::remove_file(&handle.path).await {
            Ok(()) => debug!(name = %handle.name, "Discarded artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(name = %handle.name, error = %e, "Could not discard artifact"),
        }
    }

    /// Reclamation sweep: delete every file in the shared directory
    /// except retained results.
    pub async fn sweep(&self) -> StoreResult<SweepReport> {
        self.sweep_keeping(&[]).await
    }

    /// Sweep keeping, in addition to retained results, the exact
    /// filenames in `extra`.
    ///
    /// Files that fail deletion (e.g. held open by another process) are
    /// logged and counted, never escalated to the caller. Retained names
    /// whose file no longer exists are dropped from the retained set, so
    /// it cannot grow past the files actually on disk.
    pub async fn sweep_keeping(&self, extra: &[&str]) -> StoreResult<SweepReport> {
        let retained: HashSet<String> = self
            .results
            .lock()
            .expect("results set poisoned")
            .iter()
            .cloned()
            .collect();
        let keep: HashSet<&str> = retained
            .iter()
            .map(String::as_str)
            .chain(extra.iter().copied())
            .collect();

        let mut report = SweepReport::default();
        let mut seen_retained: HashSet<String> = HashSet::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if keep.contains(name.as_str()) {
                if retained.contains(&name) {
                    seen_retained.insert(name);
                }
                report.kept += 1;
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => {
                    debug!(name = %name, "Swept scratch file");
                    report.removed += 1;
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "Could not sweep file, skipping");
                    report.failed += 1;
                }
            }
        }

        // Drop retention for names whose file disappeared; otherwise the
        // set only ever grows, and a later allocation could never reuse
        // the reclaimed space anyway.
        let stale: Vec<String> = retained
            .into_iter()
            .filter(|name| !seen_retained.contains(name))
            .collect();
        if !stale.is_empty() {
            let mut results = self.results.lock().expect("results set poisoned");
            for name in stale {
                debug!(name = %name, "Dropping retention for missing result");
                results.remove(&name);
            }
        }

        Ok(report)
    }

    /// Destructive purge: delete every file, retained results included,
    /// and forget the retained set.
    pub async fn purge_all(&self) -> StoreResult<SweepReport> {
        self.results.lock().expect("results set poisoned").clear();
        self.sweep_keeping(&[]).await
    }

    /// Resolve a caller-supplied filename to a path inside the root.
    ///
    /// Names containing separators or parent references are rejected so
    /// lookups cannot escape the shared directory.
    pub fn resolve(&self, name: &str) -> StoreResult<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(StoreError::invalid_name(name));
        }
        Ok(self.root.join(name))
    }

    /// Readiness lookup: existence and non-zero size at read time.
    pub async fn status(&self, name: &str) -> StoreResult<ArtifactStatus> {
        let path = self.resolve(name)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(ArtifactStatus {
                ready: meta.len() > 0,
                filename: name.to_string(),
                size: meta.len(),
                exists: true,
            }),
            Ok(_) => Ok(ArtifactStatus::missing(name)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(ArtifactStatus::missing(name))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, ArtifactStore) {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::open(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_allocate_unique_names() {
        let (_dir, store) = store().await;
        let mut names = HashSet::new();
        for _ in 0..1000 {
            let handle = store.allocate(ArtifactRole::Output, ".mp4");
            assert!(handle.name().starts_with("output_"));
            assert!(handle.name().ends_with(".mp4"));
            names.insert(handle.name().to_string());
        }
        assert_eq!(names.len(), 1000);
    }

    #[tokio::test]
    async fn test_concurrent_allocation_never_collides() {
        let (_dir, store) = store().await;
        let store = std::sync::Arc::new(store);

        let mut tasks = Vec::new();
        for _ in 0..64 {
            let store = std::sync::Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                (0..32)
                    .map(|_| store.allocate(ArtifactRole::Video, ".mkv").name().to_string())
                    .collect::<Vec<_>>()
            }));
        }

        let mut names = HashSet::new();
        let mut total = 0;
        for task in tasks {
            for name in task.await.unwrap() {
                names.insert(name);
                total += 1;
            }
        }
        assert_eq!(names.len(), total);
    }

    #[tokio::test]
    async fn test_sweep_retains_results_exactly() {
        let (_dir, store) = store().await;

        let result = store.allocate(ArtifactRole::Output, ".mp4");
        let scratch = store.allocate(ArtifactRole::Video, ".mp4");
        // A name that contains the result's name as a substring must
        // still be swept: retention is exact-name, not containment.
        let lookalike = store.root().join(format!("x{}", result.name()));

        fs::write(result.path(), b"result").await.unwrap();
        fs::write(scratch.path(), b"scratch").await.unwrap();
        fs::write(&lookalike, b"lookalike").await.unwrap();

        store.mark_result(&result);
        let report = store.sweep().await.unwrap();

        assert_eq!(report.kept, 1);
        assert_eq!(report.removed, 2);
        assert!(result.path().exists());
        assert!(!scratch.path().exists());
        assert!(!lookalike.exists());
    }

    #[tokio::test]
    async fn test_sweep_keeping_extra_names() {
        let (_dir, store) = store().await;
        let a = store.allocate(ArtifactRole::Audio, ".wav");
        let b = store.allocate(ArtifactRole::Audio, ".wav");
        fs::write(a.path(), b"a").await.unwrap();
        fs::write(b.path(), b"b").await.unwrap();

        store.sweep_keeping(&[a.name()]).await.unwrap();
        assert!(a.path().exists());
        assert!(!b.path().exists());
    }

    #[tokio::test]
    async fn test_sweep_drops_retention_for_missing_files() {
        let (_dir, store) = store().await;

        let gone = store.allocate(ArtifactRole::Output, ".mp4");
        let kept = store.allocate(ArtifactRole::Output, ".mp4");
        fs::write(gone.path(), b"gone").await.unwrap();
        fs::write(kept.path(), b"kept").await.unwrap();
        store.mark_result(&gone);
        store.mark_result(&kept);

        // The file vanishes out from under its retention entry.
        fs::remove_file(gone.path()).await.unwrap();
        store.sweep().await.unwrap();

        // Retention for the missing name was dropped: a new file under
        // the same name is plain scratch and gets swept.
        fs::write(gone.path(), b"reborn").await.unwrap();
        let report = store.sweep().await.unwrap();
        assert!(!gone.path().exists());
        assert!(kept.path().exists());
        assert_eq!(report.removed, 1);
        assert_eq!(report.kept, 1);
    }

    #[tokio::test]
    async fn test_purge_all_removes_results() {
        let (_dir, store) = store().await;
        let result = store.allocate(ArtifactRole::Output, ".mp4");
        fs::write(result.path(), b"result").await.unwrap();
        store.mark_result(&result);

        store.purge_all().await.unwrap();
        assert!(!result.path().exists());

        let status = store.status(result.name()).await.unwrap();
        assert!(!status.exists);
        assert!(!status.ready);

        // The retained set was cleared too: a later sweep would not
        // resurrect protection for the old name.
        fs::write(result.path(), b"again").await.unwrap();
        store.sweep().await.unwrap();
        assert!(!result.path().exists());
    }

    #[tokio::test]
    async fn test_status_reflects_size() {
        let (_dir, store) = store().await;
        let handle = store.allocate(ArtifactRole::Output, ".mp4");

        let status = store.status(handle.name()).await.unwrap();
        assert!(!status.exists);

        fs::write(handle.path(), b"").await.unwrap();
        let status = store.status(handle.name()).await.unwrap();
        assert!(status.exists);
        assert!(!status.ready, "empty file is not ready");

        fs::write(handle.path(), b"data").await.unwrap();
        let status = store.status(handle.name()).await.unwrap();
        assert!(status.ready);
        assert_eq!(status.size, 4);
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let (_dir, store) = store().await;
        assert!(store.resolve("../etc/passwd").is_err());
        assert!(store.resolve("a/b.mp4").is_err());
        assert!(store.resolve("a\\b.mp4").is_err());
        assert!(store.resolve("").is_err());
        assert!(store.resolve("output_ok.mp4").is_ok());
    }

    #[tokio::test]
    async fn test_discard_missing_file_is_silent() {
        let (_dir, store) = store().await;
        let handle = store.allocate(ArtifactRole::Video, ".mp4");
        // Never written; discard must not panic or error.
        store.discard(&handle).await;
    }
}
