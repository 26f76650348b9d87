//! # In-Memory Content Store
//!
//! Content-addressed store for tests and single-process deployments.
//! Pointers are the hex Keccak-256 of the stored bytes, so `content_id`
//! and `put` agree by construction. Supports injected put failures for
//! exercising the retry path.

use crate::errors::StorageError;
use crate::ports::ContentStore;
use async_trait::async_trait;
use curate_types::keccak256;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryContentStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    failures_remaining: RwLock<u32>,
}

impl InMemoryContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` puts fail with a backend error.
    pub async fn fail_next_puts(&self, count: u32) {
        *self.failures_remaining.write().await = count;
    }

    /// Number of stored objects.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    fn content_id(&self, bytes: &[u8]) -> String {
        hex::encode(keccak256(bytes).as_bytes())
    }

    async fn put(&self, bytes: &[u8]) -> Result<String, StorageError> {
        {
            let mut failures = self.failures_remaining.write().await;
            if *failures > 0 {
                *failures -= 1;
                return Err(StorageError::Backend {
                    detail: "injected put failure".to_string(),
                });
            }
        }
        let pointer = self.content_id(bytes);
        self.objects
            .write()
            .await
            .insert(pointer.clone(), bytes.to_vec());
        Ok(pointer)
    }

    async fn get(&self, pointer: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .read()
            .await
            .get(pointer)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                pointer: pointer.to_string(),
            })
    }

    async fn exists(&self, pointer: &str) -> Result<bool, StorageError> {
        Ok(self.objects.read().await.contains_key(pointer))
    }

    async fn unpin(&self, pointer: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(pointer);
        Ok(())
    }
}
