//! Application state.

use std::sync::Arc;

use tokio::sync::Semaphore;

use vcut_store::ArtifactStore;

use crate::config::ApiConfig;
use crate::progress::ProgressRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<ArtifactStore>,
    pub progress: Arc<ProgressRegistry>,
    /// Caps concurrent external-tool subprocesses; acquired before every
    /// auto-editor/FFmpeg invocation.
    pub tool_permits: Arc<Semaphore>,
}

impl AppState {
    /// Create new application state, opening the shared scratch directory.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = ArtifactStore::open(&config.temp_dir).await?;
        let tool_permits = Arc::new(Semaphore::new(config.max_concurrent_tools));

        Ok(Self {
            config,
            store: Arc::new(store),
            progress: Arc::new(ProgressRegistry::new()),
            tool_permits,
        })
    }
}
