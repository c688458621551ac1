use std::fmt::{Debug, Display};

use async_trait::async_trait;
use bytes::Bytes;

use crate::linked_data::Link;

mod http;
mod memory;

pub use http::{HttpContentStore, HttpContentStoreError};
pub use memory::{MemoryContentStore, MemoryContentStoreError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError<T> {
    #[error("unhandled content store provider error: {0}")]
    Provider(#[from] T),
    /// No blob is stored under this link
    #[error("content not found: {0}")]
    NotFound(Link),
    /// Returned bytes do not re-hash to the requested link.
    /// Externally sourced data is never trusted without this check.
    #[error("content does not match identifier: {0}")]
    Corrupt(Link),
}

/// Immutable, content-addressed blob storage
///
/// Identifiers are derived from content, never assigned, so both `put`
/// and `get` are idempotent: uploading identical bytes twice yields the
/// same link, and there is no update or delete operation.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug;

    /// Upload a blob and return its content-derived link
    async fn put(&self, data: Bytes) -> Result<Link, StoreError<Self::Error>>;

    /// Fetch a blob by link
    ///
    /// Implementations must verify that the returned bytes re-hash to the
    /// requested link and fail with [`StoreError::Corrupt`] otherwise.
    async fn get(&self, link: &Link) -> Result<Bytes, StoreError<Self::Error>>;

    /// Check whether a blob is stored under this link
    async fn has(&self, link: &Link) -> Result<bool, StoreError<Self::Error>>;
}
