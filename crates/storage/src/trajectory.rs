//! Trajectory blobs on top of an [`ObjectStore`].
//!
//! Each record's trajectory is stored as one text object named `{n}.txt`
//! whose body is the terms joined by `", "`.

use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;
use bytes::Bytes;
use std::sync::Arc;
use syracuse_core::{NumberKey, Trajectory};
use tokio::sync::OnceCell;
use tracing::instrument;

/// Blob store for Syracuse trajectories.
#[derive(Clone)]
pub struct TrajectoryStore {
    inner: Arc<dyn ObjectStore>,
    container_ready: Arc<OnceCell<()>>,
}

impl TrajectoryStore {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner,
            container_ready: Arc::new(OnceCell::new()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    /// Whether a trajectory blob exists for `key`. Does not read the content.
    #[instrument(skip(self), fields(backend = self.inner.backend_name()))]
    pub async fn exists(&self, key: NumberKey) -> StorageResult<bool> {
        self.inner.exists(&key.to_object_key()).await
    }

    /// Read and decode the trajectory for `key`.
    ///
    /// Returns `NotFound` when there is no blob and `Malformed` when the blob
    /// cannot be parsed or does not describe `key`'s sequence.
    #[instrument(skip(self), fields(backend = self.inner.backend_name()))]
    pub async fn get(&self, key: NumberKey) -> StorageResult<Trajectory> {
        let object_key = key.to_object_key();
        let data = self.inner.get(&object_key).await?;

        let malformed = |reason: String| StorageError::Malformed {
            key: object_key.clone(),
            reason,
        };
        let text = std::str::from_utf8(&data).map_err(|e| malformed(e.to_string()))?;
        let trajectory = Trajectory::parse(text).map_err(|e| malformed(e.to_string()))?;
        trajectory
            .validate_for(key)
            .map_err(|e| malformed(e.to_string()))?;
        Ok(trajectory)
    }

    /// Write the trajectory for `key`, creating the container on first use.
    #[instrument(skip(self, trajectory), fields(backend = self.inner.backend_name(), terms = trajectory.len()))]
    pub async fn put(&self, key: NumberKey, trajectory: &Trajectory) -> StorageResult<()> {
        self.container_ready
            .get_or_try_init(|| self.inner.ensure_container())
            .await?;
        self.inner
            .put(&key.to_object_key(), Bytes::from(trajectory.encode()))
            .await
    }

    pub async fn health_check(&self) -> StorageResult<()> {
        self.inner.health_check().await
    }
}
