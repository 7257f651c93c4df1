use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use syracuse_storage::error::{StorageError, StorageResult};
use syracuse_storage::traits::ObjectStore;

/// In-memory backend that counts calls, used to observe how the
/// trajectory store drives its backend.
#[allow(dead_code)]
#[derive(Default)]
pub struct InstrumentedBackend {
    objects: Mutex<HashMap<String, Bytes>>,
    pub container_created: AtomicUsize,
    pub puts: AtomicUsize,
    pub gets: AtomicUsize,
}

#[allow(dead_code)]
impl InstrumentedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn raw(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InstrumentedBackend {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.raw(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if Self::count(&self.container_created) == 0 {
            return Err(StorageError::Config("container missing".to_string()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn ensure_container(&self) -> StorageResult<()> {
        self.container_created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "instrumented"
    }
}
