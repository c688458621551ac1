use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::name::PointerName;
use super::provider::{PointerError, PointerProvider};
use super::record::MutableRecord;

/// In-memory pointer network using a HashMap
///
/// Keeps only the highest-sequence record per name, which is exactly the
/// view the network layer advertises.
#[derive(Debug, Clone, Default)]
pub struct MemoryPointerProvider {
    inner: Arc<RwLock<HashMap<PointerName, MutableRecord>>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryPointerProviderError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

impl MemoryPointerProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PointerProvider for MemoryPointerProvider {
    type Error = MemoryPointerProviderError;

    async fn publish(&self, record: MutableRecord) -> Result<(), PointerError<Self::Error>> {
        // An unverifiable record is never stored
        if record.verify().is_err() {
            return Err(PointerError::SignatureInvalid(record.name().clone()));
        }

        let mut inner = self.inner.write().map_err(|e| {
            PointerError::Provider(MemoryPointerProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        if let Some(current) = inner.get(record.name()) {
            // Highest sequence wins; an equal sequence is a duplicate
            // publish and is rejected rather than replayed
            if current.sequence() >= record.sequence() {
                return Err(PointerError::StaleSequence {
                    name: record.name().clone(),
                    have: current.sequence(),
                    tried: record.sequence(),
                });
            }
        }

        tracing::debug!(
            name = %record.name(),
            sequence = record.sequence(),
            pointed = %record.pointed(),
            "pointer record accepted"
        );
        inner.insert(record.name().clone(), record);
        Ok(())
    }

    async fn resolve_latest(
        &self,
        name: &PointerName,
    ) -> Result<MutableRecord, PointerError<Self::Error>> {
        let inner = self.inner.read().map_err(|e| {
            PointerError::Provider(MemoryPointerProviderError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;

        inner
            .get(name)
            .cloned()
            .ok_or_else(|| PointerError::NotFound(name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecretKey;
    use crate::linked_data::Link;
    use time::Duration;

    const TTL: Duration = Duration::hours(48);

    #[tokio::test]
    async fn test_publish_and_resolve() {
        let provider = MemoryPointerProvider::new();
        let secret = SecretKey::generate();
        let record = MutableRecord::sign(&secret, Link::raw(b"v1"), 0, TTL).unwrap();

        provider.publish(record.clone()).await.unwrap();

        let resolved = provider.resolve_latest(record.name()).await.unwrap();
        assert_eq!(resolved, record);
    }

    #[tokio::test]
    async fn test_resolve_unpublished_name() {
        let provider = MemoryPointerProvider::new();
        let (name, _) = super::super::create();

        let result = provider.resolve_latest(&name).await;
        assert!(matches!(result, Err(PointerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stale_sequence_rejected() {
        let provider = MemoryPointerProvider::new();
        let secret = SecretKey::generate();

        let first = MutableRecord::sign(&secret, Link::raw(b"v1"), 0, TTL).unwrap();
        let second = first.next(&secret, Link::raw(b"v2"), TTL).unwrap();

        provider.publish(first.clone()).await.unwrap();
        provider.publish(second.clone()).await.unwrap();

        // Re-publishing an old sequence is stale
        let replay = MutableRecord::sign(&secret, Link::raw(b"v3"), 0, TTL).unwrap();
        let result = provider.publish(replay).await;
        assert!(matches!(
            result,
            Err(PointerError::StaleSequence { have: 1, tried: 0, .. })
        ));

        // Duplicate publish of the current sequence is rejected too
        let duplicate = MutableRecord::sign(&secret, Link::raw(b"v2"), 1, TTL).unwrap();
        let result = provider.publish(duplicate).await;
        assert!(matches!(
            result,
            Err(PointerError::StaleSequence { have: 1, tried: 1, .. })
        ));

        // The winning record is unchanged
        let resolved = provider.resolve_latest(second.name()).await.unwrap();
        assert_eq!(resolved.pointed(), second.pointed());
    }

    #[tokio::test]
    async fn test_unsigned_record_never_stored() {
        let provider = MemoryPointerProvider::new();
        let secret = SecretKey::generate();
        let record = MutableRecord::sign(&secret, Link::raw(b"v1"), 0, TTL).unwrap();
        let tampered = record.with_tampered_pointed(Link::raw(b"evil"));

        let result = provider.publish(tampered.clone()).await;
        assert!(matches!(result, Err(PointerError::SignatureInvalid(_))));

        let lookup = provider.resolve_latest(tampered.name()).await;
        assert!(matches!(lookup, Err(PointerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_writers_last_writer_wins() {
        let provider = MemoryPointerProvider::new();
        let secret = SecretKey::generate();

        let base = MutableRecord::sign(&secret, Link::raw(b"v1"), 0, TTL).unwrap();
        provider.publish(base.clone()).await.unwrap();

        // Two devices both increment from sequence 0
        let from_device_a = base.next(&secret, Link::raw(b"device a"), TTL).unwrap();
        let from_device_b = base.next(&secret, Link::raw(b"device b"), TTL).unwrap();

        provider.publish(from_device_a.clone()).await.unwrap();
        // The losing device's publish is rejected, not merged
        let result = provider.publish(from_device_b).await;
        assert!(matches!(result, Err(PointerError::StaleSequence { .. })));

        let resolved = provider.resolve_latest(base.name()).await.unwrap();
        assert_eq!(resolved.pointed(), from_device_a.pointed());
    }
}
