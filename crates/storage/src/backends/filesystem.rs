//! Local filesystem storage backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Local filesystem object store.
///
/// Objects live as plain files under `<root>/<container>/`.
pub struct FilesystemBackend {
    root: PathBuf,
    container: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend. The root is created immediately, the
    /// container directory only on [`ObjectStore::ensure_container`] or the
    /// first write.
    pub async fn new(root: impl AsRef<Path>, container: &str) -> StorageResult<Self> {
        if container.is_empty()
            || container.starts_with('.')
            || container.contains(['/', '\\'])
        {
            return Err(StorageError::Config(format!(
                "invalid container name: {container:?}"
            )));
        }
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        let container = root.join(container);
        Ok(Self { root, container })
    }

    /// Directory holding this backend's objects.
    pub fn container_path(&self) -> &Path {
        &self.container
    }

    /// Get the full path for a key, with path traversal protection.
    async fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        let root = self.root.clone();
        let path = Self::validate_key(&self.container, key)?;
        tokio::task::spawn_blocking(move || Self::check_containment(&root, path))
            .await
            .map_err(|e| {
                StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}")))
            })?
    }

    /// Keys are flat file names; anything that could name another directory
    /// is rejected up front.
    fn validate_key(container: &Path, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key.contains(['/', '\\'])
            || key.contains("..")
            || key.starts_with('.')
        {
            return Err(StorageError::InvalidKey(format!(
                "path traversal not allowed: {key:?}"
            )));
        }
        Ok(container.join(key))
    }

    /// Refuse paths that resolve (through a symlinked file or container)
    /// to somewhere outside the storage root.
    fn check_containment(root: &Path, path: PathBuf) -> StorageResult<PathBuf> {
        let root_canonical = root.canonicalize()?;

        let probe = match std::fs::symlink_metadata(&path) {
            Ok(_) => path.as_path(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => match path.parent() {
                Some(parent) if std::fs::symlink_metadata(parent).is_ok() => parent,
                _ => return Ok(path),
            },
            Err(err) => return Err(StorageError::Io(err)),
        };

        let canonical = probe.canonicalize().map_err(|_| {
            StorageError::InvalidKey(format!(
                "symlink target missing or invalid: {}",
                path.display()
            ))
        })?;
        if !canonical.starts_with(&root_canonical) {
            return Err(StorageError::InvalidKey(format!(
                "resolved path escapes storage root: {}",
                path.display()
            )));
        }
        Ok(path)
    }

    fn map_not_found(key: &str, err: std::io::Error) -> StorageError {
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(key.to_string())
        } else {
            StorageError::Io(err)
        }
    }
}

#[async_trait]
impl ObjectStore for FilesystemBackend {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_path(key).await?;
        fs::try_exists(&path).await.map_err(StorageError::Io)
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.key_path(key).await?;
        let data = fs::read(&path)
            .await
            .map_err(|e| Self::map_not_found(key, e))?;
        Ok(Bytes::from(data))
    }

    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let path = self.key_path(key).await?;
        fs::create_dir_all(&self.container).await?;

        // Unique temp name so concurrent writers of the same key never share a file.
        let temp_path = self
            .container
            .join(format!(".{key}.tmp.{}", Uuid::new_v4()));
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &path).await
        }
        .await;

        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(err));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn ensure_container(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.container).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(StorageError::Config(format!(
                "storage root is not a directory: {}",
                self.root.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path(), "syracuse").await.unwrap();

        backend
            .put("6.txt", Bytes::from_static(b"6, 3, 10, 5, 16, 8, 4, 2, 1"))
            .await
            .unwrap();

        assert!(backend.exists("6.txt").await.unwrap());
        assert!(dir.path().join("syracuse").join("6.txt").is_file());
        let data = backend.get("6.txt").await.unwrap();
        assert_eq!(&data[..], b"6, 3, 10, 5, 16, 8, 4, 2, 1");
    }

    #[tokio::test]
    async fn test_missing_object_and_container() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path(), "syracuse").await.unwrap();

        // Container has not been created yet.
        assert!(!backend.exists("7.txt").await.unwrap());
        assert!(matches!(
            backend.get("7.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_put_overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path(), "syracuse").await.unwrap();

        backend.put("1.txt", Bytes::from_static(b"old")).await.unwrap();
        backend.put("1.txt", Bytes::from_static(b"1")).await.unwrap();
        assert_eq!(&backend.get("1.txt").await.unwrap()[..], b"1");

        let entries: Vec<_> = std::fs::read_dir(backend.container_path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["1.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_ensure_container_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path(), "syracuse").await.unwrap();
        backend.ensure_container().await.unwrap();
        backend.ensure_container().await.unwrap();
        assert!(backend.container_path().is_dir());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path(), "syracuse").await.unwrap();

        for key in ["../escape", "/absolute", "a/b", "..", ".hidden", "a\\b", ""] {
            assert!(
                matches!(backend.exists(key).await, Err(StorageError::InvalidKey(_))),
                "accepted {key:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_container_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for container in ["", "../up", "a/b", ".dot"] {
            assert!(matches!(
                FilesystemBackend::new(dir.path(), container).await,
                Err(StorageError::Config(_))
            ));
        }
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_symlink_traversal_rejected() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let outside_dir = tempfile::tempdir().unwrap();
        let outside_file = outside_dir.path().join("secret.txt");
        std::fs::write(&outside_file, "secret data").unwrap();

        let backend = FilesystemBackend::new(dir.path(), "syracuse").await.unwrap();
        backend.ensure_container().await.unwrap();
        symlink(&outside_file, backend.container_path().join("42.txt")).unwrap();

        match backend.get("42.txt").await {
            Err(StorageError::InvalidKey(msg)) => {
                assert!(msg.contains("escapes storage root"), "{msg}")
            }
            other => panic!("expected InvalidKey error, got: {other:?}"),
        }
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_symlinked_container_rejected_on_write() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let outside_dir = tempfile::tempdir().unwrap();
        symlink(outside_dir.path(), dir.path().join("syracuse")).unwrap();

        let backend = FilesystemBackend::new(dir.path(), "syracuse").await.unwrap();
        let result = backend.put("5.txt", Bytes::from_static(b"5, 16")).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        assert!(!outside_dir.path().join("5.txt").exists());
    }
}
