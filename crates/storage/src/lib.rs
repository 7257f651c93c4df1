//! Blob storage for Syracuse trajectories.
//!
//! This crate provides:
//! - A small object store abstraction with atomic writes
//! - Backends: local filesystem and S3-compatible (MinIO)
//! - [`TrajectoryStore`], which maps a number to its `{n}.txt` trajectory blob

pub mod backends;
pub mod error;
pub mod trajectory;
pub mod traits;

pub use backends::{filesystem::FilesystemBackend, s3::S3Backend};
pub use error::{StorageError, StorageResult};
pub use trajectory::TrajectoryStore;
pub use traits::ObjectStore;

use std::sync::Arc;
use syracuse_core::config::StorageConfig;

/// Create an object store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StorageConfig::Filesystem { path, container } => {
            let backend = FilesystemBackend::new(path, container).await?;
            Ok(Arc::new(backend))
        }
        StorageConfig::S3 {
            bucket,
            endpoint,
            region,
            prefix,
            access_key_id,
            secret_access_key,
            force_path_style,
        } => {
            let backend = S3Backend::new(
                bucket,
                endpoint.clone(),
                region.clone(),
                prefix.clone(),
                access_key_id.clone(),
                secret_access_key.clone(),
                *force_path_style,
            )
            .await?;
            Ok(Arc::new(backend))
        }
    }
}
