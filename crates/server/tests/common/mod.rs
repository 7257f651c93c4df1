//! Server test utilities.
//!
//! Note: #[allow(dead_code)] because each test file compiles common/ separately.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use syracuse_core::config::{
    AppConfig, CacheConfig, MetadataConfig, ServerConfig, StorageConfig,
};
use syracuse_metadata::{MetadataStore, SqliteStore};
use syracuse_server::{AppState, create_router};
use syracuse_storage::{FilesystemBackend, ObjectStore, StorageError, StorageResult};
use tempfile::TempDir;

/// Filesystem store that can be switched into a failing mode.
#[allow(dead_code)]
pub struct SwitchableStore {
    inner: FilesystemBackend,
    pub failing: AtomicBool,
}

#[allow(dead_code)]
impl SwitchableStore {
    /// Write raw bytes, bypassing the trajectory encoder.
    pub async fn put_raw(&self, key: &str, data: &'static [u8]) {
        self.inner.ensure_container().await.unwrap();
        self.inner.put(key, Bytes::from_static(data)).await.unwrap();
    }

    fn check(&self) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("storage offline")));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for SwitchableStore {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.check()?;
        self.inner.exists(key).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.check()?;
        self.inner.put(key, data).await
    }

    fn backend_name(&self) -> &'static str {
        "switchable"
    }
}

/// A test server wrapper with all dependencies.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub storage: Arc<SwitchableStore>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage.
    pub async fn new() -> Self {
        Self::with_server_config(ServerConfig::default()).await
    }

    pub async fn with_server_config(server: ServerConfig) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let storage_path = temp_dir.path().join("storage");
        let storage = Arc::new(SwitchableStore {
            inner: FilesystemBackend::new(&storage_path, "syracuse")
                .await
                .expect("Failed to create storage backend"),
            failing: AtomicBool::new(false),
        });

        let db_path = temp_dir.path().join("metadata.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path, 5)
                .await
                .expect("Failed to create metadata store"),
        );

        let config = AppConfig {
            server,
            storage: StorageConfig::Filesystem {
                path: storage_path,
                container: "syracuse".to_string(),
            },
            metadata: MetadataConfig::Sqlite {
                path: db_path,
                busy_timeout_secs: 5,
            },
            cache: CacheConfig {
                backend_timeout_ms: 1000,
            },
        };

        let state = AppState::new(config, storage.clone(), metadata);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            storage,
            _temp_dir: temp_dir,
        }
    }
}
