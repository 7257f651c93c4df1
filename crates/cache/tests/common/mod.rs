//! Test harness: a coordinator over real SQLite plus an in-memory blob store,
//! both wrapped so tests can inject failures and hangs.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use syracuse_cache::CacheCoordinator;
use syracuse_core::NumberKey;
use syracuse_metadata::{
    MetadataError, MetadataResult, MetadataStore, NumberRepo, NumberRow, SqliteStore,
};
use syracuse_storage::{ObjectStore, StorageError, StorageResult, TrajectoryStore};
use tempfile::TempDir;

/// How long a "hung" backend sleeps; far longer than the test timeout.
pub const HANG: Duration = Duration::from_secs(30);

/// Timeout handed to the coordinator under test.
pub const BACKEND_TIMEOUT: Duration = Duration::from_millis(250);

/// Switches shared by the fault-injecting wrappers.
#[derive(Default)]
pub struct Faults {
    pub fail: AtomicBool,
    pub hang: AtomicBool,
}

impl Faults {
    #[allow(dead_code)]
    pub fn set_fail(&self, on: bool) {
        self.fail.store(on, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn set_hang(&self, on: bool) {
        self.hang.store(on, Ordering::SeqCst);
    }

    async fn apply(&self) -> bool {
        if self.hang.load(Ordering::SeqCst) {
            tokio::time::sleep(HANG).await;
        }
        self.fail.load(Ordering::SeqCst)
    }
}

/// In-memory object store with separate fault switches for reads and writes.
#[derive(Default)]
pub struct FaultyObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
    pub reads: Faults,
    pub writes: Faults,
    pub puts: AtomicUsize,
}

#[allow(dead_code)]
impl FaultyObjectStore {
    pub fn insert_raw(&self, key: &str, data: &'static [u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from_static(data));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

fn injected() -> StorageError {
    StorageError::Io(std::io::Error::other("injected failure"))
}

#[async_trait]
impl ObjectStore for FaultyObjectStore {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        if self.reads.apply().await {
            return Err(injected());
        }
        Ok(self.contains(key))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        if self.reads.apply().await {
            return Err(injected());
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        if self.writes.apply().await {
            return Err(injected());
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "faulty-memory"
    }
}

/// Metadata store wrapper around SQLite with fault switches.
pub struct FaultyMetadata {
    inner: SqliteStore,
    pub reads: Faults,
    pub writes: Faults,
    /// Report inserts as unique-key violations instead of performing them.
    pub constraint_on_insert: AtomicBool,
}

impl FaultyMetadata {
    fn injected() -> MetadataError {
        MetadataError::Internal("injected failure".to_string())
    }
}

#[async_trait]
impl NumberRepo for FaultyMetadata {
    async fn number_exists(&self, key: NumberKey) -> MetadataResult<bool> {
        if self.reads.apply().await {
            return Err(Self::injected());
        }
        self.inner.number_exists(key).await
    }

    async fn get_number(&self, key: NumberKey) -> MetadataResult<Option<NumberRow>> {
        if self.reads.apply().await {
            return Err(Self::injected());
        }
        self.inner.get_number(key).await
    }

    async fn insert_number_if_absent(&self, row: &NumberRow) -> MetadataResult<bool> {
        if self.writes.apply().await {
            return Err(Self::injected());
        }
        if self.constraint_on_insert.load(Ordering::SeqCst) {
            return Err(MetadataError::Constraint(format!(
                "number {} already exists",
                row.number
            )));
        }
        self.inner.insert_number_if_absent(row).await
    }

    async fn count_numbers(&self) -> MetadataResult<u64> {
        self.inner.count_numbers().await
    }
}

#[async_trait]
impl MetadataStore for FaultyMetadata {
    async fn migrate(&self) -> MetadataResult<()> {
        self.inner.migrate().await
    }

    async fn health_check(&self) -> MetadataResult<()> {
        self.inner.health_check().await
    }

    fn backend_name(&self) -> &'static str {
        "faulty-sqlite"
    }
}

/// A coordinator plus handles on both wrapped stores.
#[allow(dead_code)]
pub struct TestCache {
    pub coordinator: CacheCoordinator,
    pub metadata: Arc<FaultyMetadata>,
    pub blobs: Arc<FaultyObjectStore>,
    _temp_dir: TempDir,
}

impl TestCache {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let sqlite = SqliteStore::new(temp_dir.path().join("metadata.db"), 5)
            .await
            .expect("Failed to open SQLite store");

        let metadata = Arc::new(FaultyMetadata {
            inner: sqlite,
            reads: Faults::default(),
            writes: Faults::default(),
            constraint_on_insert: AtomicBool::new(false),
        });
        let blobs = Arc::new(FaultyObjectStore::default());

        let coordinator = CacheCoordinator::new(
            metadata.clone(),
            TrajectoryStore::new(blobs.clone()),
            BACKEND_TIMEOUT,
        );

        Self {
            coordinator,
            metadata,
            blobs,
            _temp_dir: temp_dir,
        }
    }
}

#[allow(dead_code)]
pub fn key(n: u64) -> NumberKey {
    NumberKey::new(n).unwrap()
}
