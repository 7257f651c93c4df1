//! Application state shared across handlers.

use std::sync::Arc;
use syracuse_cache::CacheCoordinator;
use syracuse_core::config::AppConfig;
use syracuse_metadata::MetadataStore;
use syracuse_storage::{ObjectStore, TrajectoryStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub coordinator: CacheCoordinator,
    pub metadata: Arc<dyn MetadataStore>,
}

impl AppState {
    /// Wire the two backends into a coordinator using the configured timeout.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        let coordinator = CacheCoordinator::new(
            metadata.clone(),
            TrajectoryStore::new(storage),
            config.cache.backend_timeout(),
        );
        Self {
            config: Arc::new(config),
            coordinator,
            metadata,
        }
    }
}
