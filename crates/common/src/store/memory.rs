use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use super::{ContentStore, StoreError};
use crate::linked_data::Link;

/// In-memory content store backed by a HashMap
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    inner: Arc<RwLock<HashMap<Link, Bytes>>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryContentStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blobs currently stored
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    type Error = MemoryContentStoreError;

    async fn put(&self, data: Bytes) -> Result<Link, StoreError<Self::Error>> {
        let link = Link::raw(&data);
        let mut inner = self.inner.write().map_err(|e| {
            StoreError::Provider(MemoryContentStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        // Idempotent: identical bytes hash to the same link
        inner.entry(link).or_insert(data);
        Ok(link)
    }

    async fn get(&self, link: &Link) -> Result<Bytes, StoreError<Self::Error>> {
        let inner = self.inner.read().map_err(|e| {
            StoreError::Provider(MemoryContentStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;

        let data = inner.get(link).cloned().ok_or(StoreError::NotFound(*link))?;
        if !link.matches(&data) {
            return Err(StoreError::Corrupt(*link));
        }
        Ok(data)
    }

    async fn has(&self, link: &Link) -> Result<bool, StoreError<Self::Error>> {
        let inner = self.inner.read().map_err(|e| {
            StoreError::Provider(MemoryContentStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;

        Ok(inner.contains_key(link))
    }
}
