use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::storage::{BlobStore, StorageError};

#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<HashMap<String, (String, Bytes)>>,
    failing: AtomicBool,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `put` fails.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn get(&self, key: &str) -> Option<(String, Bytes)> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, content_type: &str, content: Bytes) -> Result<String, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError {
                key: key.to_owned(),
                reason: "blob store unavailable".to_owned(),
            });
        }

        self.objects
            .write()
            .await
            .insert(key.to_owned(), (content_type.to_owned(), content));
        Ok(key.to_owned())
    }
}
