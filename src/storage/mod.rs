pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::errors::AppError;

pub use memory::InMemoryBlobStore;
pub use s3::S3BlobStore;

#[derive(Debug, Clone, Error)]
#[error("blob store put for '{key}' failed: {reason}")]
pub struct StorageError {
    pub key: String,
    pub reason: String,
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::StorageFailure(err.to_string())
    }
}

/// Byte storage for uploaded media. `put` returns the stored key, which is
/// the handle recorded on the owning row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, content: Bytes) -> Result<String, StorageError>;
}
