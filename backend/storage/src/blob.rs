//! Blob gateway: byte-addressable receipt image storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to store object: {0}")]
    PutFailed(String),

    #[error("object '{0}' unavailable in blob store and no local fallback")]
    Unavailable(String),
}

/// Durable byte store for receipt images.
#[async_trait]
pub trait BlobGateway: Send + Sync {
    /// Store bytes and return the generated object id.
    async fn put(&self, bytes: &[u8], filename_hint: &str) -> Result<String, StorageError>;

    /// Fetch bytes by object id.
    async fn get(&self, object_id: &str) -> Result<Vec<u8>, StorageError>;
}

/// Filesystem-backed blob store.
///
/// `get` falls back to resolving the object id as a local path when it is
/// not present under the store root, so receipts referenced by absolute
/// path (imported out-of-band) still resolve.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Object id: fresh uuid plus the extension of the filename hint.
    fn object_name(filename_hint: &str) -> String {
        match filename_hint.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => format!("{}.{ext}", Uuid::new_v4()),
            _ => Uuid::new_v4().to_string(),
        }
    }
}

#[async_trait]
impl BlobGateway for FsBlobStore {
    async fn put(&self, bytes: &[u8], filename_hint: &str) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::PutFailed(e.to_string()))?;

        let object_id = Self::object_name(filename_hint);
        let path = self.root.join(&object_id);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::PutFailed(e.to_string()))?;

        info!(object_id = %object_id, size = bytes.len(), "Stored receipt image");
        Ok(object_id)
    }

    async fn get(&self, object_id: &str) -> Result<Vec<u8>, StorageError> {
        // Path-shaped ids are reduced to their file name within the store.
        let name = Path::new(object_id)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| object_id.to_string());

        let path = self.root.join(&name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(object_id = %name, size = bytes.len(), "Fetched receipt image");
                Ok(bytes)
            }
            Err(err) => {
                warn!(object_id = %object_id, error = %err, "Blob store read failed; trying local path fallback");
                let local = Path::new(object_id);
                if local.exists() {
                    info!(path = %local.display(), "Reading receipt image from local filesystem");
                    return tokio::fs::read(local)
                        .await
                        .map_err(|_| StorageError::Unavailable(object_id.to_string()));
                }
                Err(StorageError::Unavailable(object_id.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let object_id = store.put(b"image-bytes", "receipt.jpg").await.unwrap();
        assert!(object_id.ends_with(".jpg"));

        let bytes = store.get(&object_id).await.unwrap();
        assert_eq!(bytes, b"image-bytes");
    }

    #[tokio::test]
    async fn hint_without_extension_still_stores() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let object_id = store.put(b"x", "noext").await.unwrap();
        assert!(!object_id.contains('.'));
        assert_eq!(store.get(&object_id).await.unwrap(), b"x");
    }

    #[tokio::test]
    async fn get_falls_back_to_local_path() {
        let store_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(store_dir.path());

        let outside = other_dir.path().join("imported.jpg");
        tokio::fs::write(&outside, b"outside").await.unwrap();

        let bytes = store.get(outside.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"outside");
    }

    #[tokio::test]
    async fn missing_object_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let err = store.get("nope.jpg").await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }
}
