//! Local-disk implementation of [`FileStore`].

use async_trait::async_trait;
use axum::body::Bytes;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::FileStore;
use crate::error::{AppError, AppResult};

/// Maps accepted image content types to file extensions. Anything not in
/// this list is rejected before touching the disk.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpg" | "image/jpeg" => Some("jpeg"),
        _ => None,
    }
}

/// File store writing into a directory on the local filesystem.
///
/// References have the form `{root}/{uuid}.{ext}`; with the default root
/// of `uploads/images` the reference is also the URL path the static file
/// service answers on, mirroring how clients consume it.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Creates the store, ensuring the root directory exists.
    pub async fn create(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::Configuration {
                key: "storage.root".to_string(),
                source: anyhow::anyhow!("Failed to create {}: {}", root.display(), e),
            })?;
        Ok(Self { root })
    }

    /// The directory files are written into.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, bytes: Bytes, content_type: &str) -> AppResult<String> {
        let extension = extension_for(content_type).ok_or_else(|| AppError::Validation {
            field: "image".to_string(),
            reason: format!("Unsupported image type '{}'", content_type),
        })?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Failed to write {}: {}", path.display(), e),
            })?;

        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        let path = Path::new(reference);

        // Only references we produced are deletable; anything outside the
        // storage root is refused.
        if !path.starts_with(&self.root) {
            return Err(AppError::Validation {
                field: "reference".to_string(),
                reason: format!("'{}' is not a stored file reference", reference),
            });
        }

        tokio::fs::remove_file(path)
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Failed to delete {}: {}", reference, e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_in_tempdir() -> (tempfile::TempDir, LocalFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::create(dir.path().join("images"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn stores_bytes_and_returns_a_readable_reference() {
        let (_dir, store) = store_in_tempdir().await;

        let reference = store
            .store(Bytes::from_static(b"not really a png"), "image/png")
            .await
            .expect("store should succeed");

        assert!(reference.ends_with(".png"));
        let written = tokio::fs::read(&reference).await.unwrap();
        assert_eq!(written, b"not really a png");
    }

    #[tokio::test]
    async fn jpeg_aliases_share_an_extension() {
        let (_dir, store) = store_in_tempdir().await;

        let r1 = store
            .store(Bytes::from_static(b"a"), "image/jpg")
            .await
            .unwrap();
        let r2 = store
            .store(Bytes::from_static(b"b"), "image/jpeg")
            .await
            .unwrap();

        assert!(r1.ends_with(".jpeg"));
        assert!(r2.ends_with(".jpeg"));
        assert_ne!(r1, r2);
    }

    #[tokio::test]
    async fn rejects_unsupported_content_types() {
        let (_dir, store) = store_in_tempdir().await;

        let result = store
            .store(Bytes::from_static(b"<svg/>"), "image/svg+xml")
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn delete_removes_the_stored_file() {
        let (_dir, store) = store_in_tempdir().await;

        let reference = store
            .store(Bytes::from_static(b"bytes"), "image/png")
            .await
            .unwrap();

        store.delete(&reference).await.expect("delete should work");
        assert!(tokio::fs::metadata(&reference).await.is_err());
    }

    #[tokio::test]
    async fn delete_refuses_paths_outside_the_root() {
        let (_dir, store) = store_in_tempdir().await;

        let result = store.delete("/etc/passwd").await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn deleting_a_missing_file_is_an_error_for_the_caller_to_swallow() {
        let (_dir, store) = store_in_tempdir().await;

        let bogus = store.root().join("no-such-file.png");
        let result = store.delete(&bogus.to_string_lossy()).await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
