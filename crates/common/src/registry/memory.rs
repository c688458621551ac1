use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::provider::{RegistryError, RegistryProvider};
use super::{PrivacyMode, RegistryEntry};
use crate::linked_data::Link;
use crate::pointer::PointerName;
use crate::wallet::Address;

/// In-memory registry ledger using HashMaps
///
/// Models the post-authentication view of the ledger: the `owner`
/// argument is taken as the verified caller. Enforces ownership on every
/// write and the one-active-binding-per-domain invariant.
#[derive(Debug, Clone)]
pub struct MemoryRegistryProvider {
    inner: Arc<RwLock<MemoryRegistryProviderInner>>,
    domain_fee: u64,
}

#[derive(Debug, Default)]
struct MemoryRegistryProviderInner {
    /// Entries keyed by mutable name
    entries: HashMap<PointerName, RegistryEntry>,
    /// Active domain bindings: domain -> name
    domains: HashMap<String, PointerName>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryRegistryProviderError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

impl MemoryRegistryProvider {
    pub fn new(domain_fee: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryRegistryProviderInner::default())),
            domain_fee,
        }
    }

    fn read(
        &self,
    ) -> Result<
        std::sync::RwLockReadGuard<'_, MemoryRegistryProviderInner>,
        RegistryError<MemoryRegistryProviderError>,
    > {
        self.inner.read().map_err(|e| {
            RegistryError::Provider(MemoryRegistryProviderError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(
        &self,
    ) -> Result<
        std::sync::RwLockWriteGuard<'_, MemoryRegistryProviderInner>,
        RegistryError<MemoryRegistryProviderError>,
    > {
        self.inner.write().map_err(|e| {
            RegistryError::Provider(MemoryRegistryProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryRegistryProvider {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MemoryRegistryProviderInner {
    fn owned_entry_mut(
        &mut self,
        owner: &Address,
        name: &PointerName,
    ) -> Result<&mut RegistryEntry, RegistryError<MemoryRegistryProviderError>> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.clone()))?;
        if entry.owner != *owner {
            return Err(RegistryError::NotOwner);
        }
        Ok(entry)
    }
}

#[async_trait]
impl RegistryProvider for MemoryRegistryProvider {
    type Error = MemoryRegistryProviderError;

    async fn register(
        &self,
        owner: &Address,
        name: &PointerName,
        encrypted_key_locator: Option<Link>,
        privacy: PrivacyMode,
    ) -> Result<(), RegistryError<Self::Error>> {
        let mut inner = self.write()?;

        if let Some(existing) = inner.entries.get(name) {
            if existing.owner != *owner {
                return Err(RegistryError::AlreadyExists);
            }
            // Idempotent re-register by the same owner: a retried
            // creation saga converges instead of duplicating
            return Ok(());
        }

        let entry = RegistryEntry {
            owner: owner.clone(),
            name: name.clone(),
            encrypted_key_locator,
            privacy,
            active: true,
            custom_domain: None,
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
        };
        tracing::debug!(%name, %owner, "identity registered");
        inner.entries.insert(name.clone(), entry);
        Ok(())
    }

    async fn bind_domain(
        &self,
        owner: &Address,
        name: &PointerName,
        domain: &str,
        fee: u64,
    ) -> Result<(), RegistryError<Self::Error>> {
        if fee < self.domain_fee {
            return Err(RegistryError::InsufficientFee {
                required: self.domain_fee,
                offered: fee,
            });
        }

        let mut inner = self.write()?;

        // Authorization before anything else
        inner.owned_entry_mut(owner, name)?;

        if let Some(bound) = inner.domains.get(domain) {
            if bound == name {
                // Already bound to this identity; idempotent
                return Ok(());
            }
            return Err(RegistryError::DomainTaken(domain.to_string()));
        }

        let entry = inner.owned_entry_mut(owner, name)?;
        // Rebinding is release-then-bind: the previous domain goes back
        // into the free pool
        let previous = entry.custom_domain.replace(domain.to_string());
        if let Some(previous) = previous {
            inner.domains.remove(&previous);
        }
        inner.domains.insert(domain.to_string(), name.clone());
        tracing::debug!(%name, domain, "domain bound");
        Ok(())
    }

    async fn release_domain(
        &self,
        owner: &Address,
        name: &PointerName,
    ) -> Result<(), RegistryError<Self::Error>> {
        let mut inner = self.write()?;

        let entry = inner.owned_entry_mut(owner, name)?;
        let Some(domain) = entry.custom_domain.take() else {
            return Ok(());
        };
        inner.domains.remove(&domain);
        tracing::debug!(%name, domain, "domain released");
        Ok(())
    }

    async fn set_active(
        &self,
        owner: &Address,
        name: &PointerName,
        active: bool,
    ) -> Result<(), RegistryError<Self::Error>> {
        let mut inner = self.write()?;
        let entry = inner.owned_entry_mut(owner, name)?;
        entry.active = active;
        Ok(())
    }

    async fn update_key_locator(
        &self,
        owner: &Address,
        name: &PointerName,
        locator: Link,
    ) -> Result<(), RegistryError<Self::Error>> {
        let mut inner = self.write()?;
        let entry = inner.owned_entry_mut(owner, name)?;
        entry.encrypted_key_locator = Some(locator);
        Ok(())
    }

    async fn lookup_by_domain(
        &self,
        domain: &str,
    ) -> Result<PointerName, RegistryError<Self::Error>> {
        let inner = self.read()?;
        inner
            .domains
            .get(domain)
            .cloned()
            .ok_or_else(|| RegistryError::DomainNotFound(domain.to_string()))
    }

    async fn lookup_entry(
        &self,
        name: &PointerName,
    ) -> Result<RegistryEntry, RegistryError<Self::Error>> {
        let inner = self.read()?;
        inner
            .entries
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.clone()))
    }

    fn domain_fee(&self) -> u64 {
        self.domain_fee
    }
}
