//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Object storage backend trait.
///
/// Keys are flat names inside the backend's container (a directory for the
/// filesystem backend, a bucket for S3). Writes must be atomic: a concurrent
/// reader sees either the previous object or the complete new one.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Check if an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get an object's full contents.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put an object, replacing any previous content.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Create the container if it does not exist yet.
    async fn ensure_container(&self) -> StorageResult<()> {
        Ok(())
    }

    /// Get the backend name for logging/metrics.
    fn backend_name(&self) -> &'static str;

    /// Health check for the backend.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
