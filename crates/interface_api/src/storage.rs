//! Document storage
//!
//! Claims reference their supporting documents by an opaque URL returned
//! from a [`DocumentStorage`] implementation. The filesystem adapter backs
//! the server; the in-memory adapter backs tests. Stored URLs are recorded
//! on the claim verbatim, so an implementation's URL scheme is its own to
//! choose.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Document storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to store document: {0}")]
    Store(String),
    #[error("failed to remove document: {0}")]
    Remove(String),
}

/// Port for placing uploaded document bytes outside the claim record
#[async_trait]
pub trait DocumentStorage: Send + Sync + 'static {
    /// Stores the bytes and returns the URL to record on the claim
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Removes a previously stored document; the compensating action for
    /// a failed attachment
    async fn remove(&self, url: &str) -> Result<(), StorageError>;
}

/// Stores documents under a local directory with UUID-prefixed names
#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    upload_dir: PathBuf,
}

impl LocalDocumentStorage {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Drops path separators so an uploaded file name cannot escape the
    /// upload directory
    fn sanitize(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        if cleaned.is_empty() {
            "document".to_string()
        } else {
            cleaned
        }
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| StorageError::Store(e.to_string()))?;

        let file_name = format!("{}-{}", Uuid::new_v4(), Self::sanitize(name));
        let path = self.upload_dir.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Store(e.to_string()))?;

        debug!(path = %path.display(), size = bytes.len(), "document stored");
        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        tokio::fs::remove_file(url)
            .await
            .map_err(|e| StorageError::Remove(e.to_string()))
    }
}

/// In-memory document storage for tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStorage {
    documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryDocumentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored bytes for a URL, if present
    pub async fn bytes(&self, url: &str) -> Option<Vec<u8>> {
        self.documents.read().await.get(url).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStorage for InMemoryDocumentStorage {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let url = format!("mem://{}-{}", Uuid::new_v4(), name);
        self.documents
            .write()
            .await
            .insert(url.clone(), bytes.to_vec());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        self.documents
            .write()
            .await
            .remove(url)
            .map(|_| ())
            .ok_or_else(|| StorageError::Remove(format!("unknown document: {url}")))
    }
}
