//! Uploaded file storage.
//!
//! Stores image bytes and hands back an opaque reference that doubles as
//! the public URL path. Deletion is best-effort at every call site: a
//! dangling file is a minor leak, not a correctness violation, so callers
//! log failures instead of surfacing them.

mod local;

pub use local::LocalFileStore;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::error::AppResult;

/// Trait for storing and deleting uploaded files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores the given bytes and returns a reference to the stored file.
    ///
    /// # Errors
    /// `AppError::Validation` for an unsupported content type,
    /// `AppError::Internal` when the bytes cannot be written.
    async fn store(&self, bytes: Bytes, content_type: &str) -> AppResult<String>;

    /// Deletes a previously stored file by its reference.
    async fn delete(&self, reference: &str) -> AppResult<()>;
}

/// Logs and swallows a failed file deletion.
///
/// The shared idiom for every best-effort cleanup site: record deletion,
/// failed signup, failed place creation.
pub async fn discard_stored_file(storage: &dyn FileStore, reference: &str) {
    if let Err(error) = storage.delete(reference).await {
        tracing::warn!(
            reference = %reference,
            error = %error,
            "Failed to remove stored file"
        );
    }
}
