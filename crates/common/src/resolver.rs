//! # Resolver
//!
//! Resolves any of {raw pointer name, custom domain, legacy static
//! identifier} to the current content identifier, verifying every
//! externally sourced record before treating it as authoritative.
//!
//! Identifier handling is an explicit classification step: an incoming
//! string is tagged as a pointer name, a domain candidate, or a legacy
//! identifier before any lookup happens. The legacy path is a deprecated
//! compatibility shim backed by a static mapping table; it exists only
//! for identifiers created before the pointer scheme and is never
//! extended for new writes.
//!
//! The resolver also enforces the consumer-side monotonicity invariant:
//! it remembers the highest sequence it has accepted per name and never
//! regresses, regardless of what the network layer serves.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::linked_data::Link;
use crate::pointer::{MutableRecord, PointerError, PointerName, PointerProvider};
use crate::registry::{RegistryError, RegistryProvider};

/// An incoming identifier, classified before any lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// A well-formed pointer name; resolved directly against the pointer layer
    Pointer(PointerName),
    /// A candidate custom domain; resolved through the registry
    Domain(String),
    /// Anything else; only resolvable through the legacy mapping table
    Legacy(String),
}

impl Identifier {
    /// Classify a raw identifier string
    ///
    /// Total: every string maps to exactly one variant.
    pub fn classify(raw: &str) -> Self {
        if let Ok(name) = PointerName::parse(raw) {
            return Identifier::Pointer(name);
        }
        if is_domain_candidate(raw) {
            return Identifier::Domain(raw.to_string());
        }
        Identifier::Legacy(raw.to_string())
    }
}

fn is_domain_candidate(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 253
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError<P, R>
where
    P: Display + Debug,
    R: Display + Debug,
{
    #[error("pointer network error: {0}")]
    Pointer(PointerError<P>),
    #[error("registry error: {0}")]
    Registry(RegistryError<R>),
    /// The domain is bound to no identity, in the registry or the legacy table
    #[error("domain not found: {0}")]
    DomainNotFound(String),
    /// The name has never published a record
    #[error("identity not found: {0}")]
    IdentityNotFound(PointerName),
    /// The latest record's expiry has passed; callers opting into
    /// staleness can tolerate this
    #[error("record for {name} expired at {expired_at}")]
    RecordExpired { name: PointerName, expired_at: i64 },
    /// The record's signature does not verify. Never silently ignored:
    /// an unverifiable record is never trusted for resolution.
    #[error("record signature invalid for {0}")]
    SignatureInvalid(PointerName),
    /// The identifier predates the pointer scheme and has no legacy mapping
    #[error("unsupported legacy identifier: {0}")]
    UnsupportedLegacyFormat(String),
    /// The served record does not advance past the highest sequence this
    /// resolver has already accepted for the name
    #[error("stale record for {name}: observed sequence {observed}, got {got}")]
    StaleRecord {
        name: PointerName,
        observed: u64,
        got: u64,
    },
}

/// A successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    record: MutableRecord,
}

impl Resolved {
    pub fn name(&self) -> &PointerName {
        self.record.name()
    }

    /// The current content identifier the identity points at
    pub fn pointed(&self) -> &Link {
        self.record.pointed()
    }

    pub fn sequence(&self) -> u64 {
        self.record.sequence()
    }

    pub fn record(&self) -> &MutableRecord {
        &self.record
    }
}

/// Resolves identifiers to verified content identifiers
#[derive(Debug, Clone)]
pub struct Resolver<P, R>
where
    P: PointerProvider,
    R: RegistryProvider,
{
    pointers: P,
    registry: R,
    /// Deprecated static mapping for identifiers that predate the pointer
    /// scheme; never written at runtime
    legacy: HashMap<String, PointerName>,
    /// Highest (sequence, pointed) accepted per name
    observed: Arc<Mutex<HashMap<PointerName, (u64, Link)>>>,
    tolerate_stale: bool,
}

impl<P, R> Resolver<P, R>
where
    P: PointerProvider,
    R: RegistryProvider,
{
    pub fn new(pointers: P, registry: R) -> Self {
        Self {
            pointers,
            registry,
            legacy: HashMap::new(),
            observed: Arc::new(Mutex::new(HashMap::new())),
            tolerate_stale: false,
        }
    }

    /// Install the legacy compatibility table
    pub fn with_legacy_aliases(mut self, legacy: HashMap<String, PointerName>) -> Self {
        self.legacy = legacy;
        self
    }

    /// Accept expired records instead of failing with `RecordExpired`
    pub fn with_tolerate_stale(mut self, tolerate: bool) -> Self {
        self.tolerate_stale = tolerate;
        self
    }

    /// Resolve a raw identifier string
    pub async fn resolve(&self, raw: &str) -> Result<Resolved, ResolveError<P::Error, R::Error>> {
        self.resolve_identifier(Identifier::classify(raw)).await
    }

    /// Resolve an already classified identifier
    pub async fn resolve_identifier(
        &self,
        identifier: Identifier,
    ) -> Result<Resolved, ResolveError<P::Error, R::Error>> {
        match identifier {
            Identifier::Pointer(name) => self.resolve_name(&name).await,
            Identifier::Domain(domain) => {
                match self.registry.lookup_by_domain(&domain).await {
                    Ok(name) => self.resolve_name(&name).await,
                    Err(RegistryError::DomainNotFound(_)) => {
                        // Fall through to the legacy compatibility table
                        match self.legacy.get(&domain) {
                            Some(name) => {
                                tracing::debug!(domain, %name, "resolved via legacy table");
                                self.resolve_name(&name.clone()).await
                            }
                            None => Err(ResolveError::DomainNotFound(domain)),
                        }
                    }
                    Err(e) => Err(ResolveError::Registry(e)),
                }
            }
            Identifier::Legacy(raw) => match self.legacy.get(&raw) {
                Some(name) => self.resolve_name(&name.clone()).await,
                None => Err(ResolveError::UnsupportedLegacyFormat(raw)),
            },
        }
    }

    /// Resolve a pointer name to its latest verified record
    pub async fn resolve_name(
        &self,
        name: &PointerName,
    ) -> Result<Resolved, ResolveError<P::Error, R::Error>> {
        let record = match self.pointers.resolve_latest(name).await {
            Ok(record) => record,
            Err(PointerError::NotFound(name)) => {
                return Err(ResolveError::IdentityNotFound(name))
            }
            Err(e) => return Err(ResolveError::Pointer(e)),
        };

        // Never assume the network layer validated anything
        if record.verify().is_err() {
            return Err(ResolveError::SignatureInvalid(name.clone()));
        }

        if record.is_expired() && !self.tolerate_stale {
            return Err(ResolveError::RecordExpired {
                name: name.clone(),
                expired_at: record.expires_at(),
            });
        }

        self.check_monotonic(&record)?;
        Ok(Resolved { record })
    }

    /// Consumer-side monotonicity: never accept a record that regresses
    /// behind the highest sequence already accepted for the name, and
    /// never accept a *different* record at the same sequence.
    fn check_monotonic(
        &self,
        record: &MutableRecord,
    ) -> Result<(), ResolveError<P::Error, R::Error>> {
        let mut observed = self.observed.lock();
        if let Some((seen_seq, seen_pointed)) = observed.get(record.name()) {
            let regressed = record.sequence() < *seen_seq;
            let equivocated =
                record.sequence() == *seen_seq && record.pointed() != seen_pointed;
            if regressed || equivocated {
                return Err(ResolveError::StaleRecord {
                    name: record.name().clone(),
                    observed: *seen_seq,
                    got: record.sequence(),
                });
            }
        }
        observed.insert(
            record.name().clone(),
            (record.sequence(), *record.pointed()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecretKey;
    use crate::pointer::{self, MemoryPointerProvider};
    use crate::registry::{MemoryRegistryProvider, PrivacyMode};
    use crate::wallet::Address;
    use time::Duration;

    const TTL: Duration = Duration::hours(48);

    fn resolver() -> (
        Resolver<MemoryPointerProvider, MemoryRegistryProvider>,
        MemoryPointerProvider,
        MemoryRegistryProvider,
    ) {
        let pointers = MemoryPointerProvider::new();
        let registry = MemoryRegistryProvider::default();
        (
            Resolver::new(pointers.clone(), registry.clone()),
            pointers,
            registry,
        )
    }

    #[test]
    fn test_classification() {
        let (name, _) = pointer::create();
        assert_eq!(
            Identifier::classify(name.as_str()),
            Identifier::Pointer(name)
        );
        assert_eq!(
            Identifier::classify("feedback"),
            Identifier::Domain("feedback".to_string())
        );
        assert_eq!(
            Identifier::classify("forms.example.com"),
            Identifier::Domain("forms.example.com".to_string())
        );
        assert_eq!(
            Identifier::classify("static/form?id=42"),
            Identifier::Legacy("static/form?id=42".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_by_raw_name() {
        let (resolver, pointers, _) = resolver();
        let secret = SecretKey::generate();
        let record =
            MutableRecord::sign(&secret, Link::raw(b"form v1"), 0, TTL).unwrap();
        pointers.publish(record.clone()).await.unwrap();

        let resolved = resolver.resolve(record.name().as_str()).await.unwrap();
        assert_eq!(resolved.pointed(), record.pointed());
        assert_eq!(resolved.sequence(), 0);
    }

    #[tokio::test]
    async fn test_resolve_unpublished_name() {
        let (resolver, _, _) = resolver();
        let (name, _) = pointer::create();

        let result = resolver.resolve(name.as_str()).await;
        assert!(matches!(result, Err(ResolveError::IdentityNotFound(_))));
    }

    #[tokio::test]
    async fn test_domain_resolves_to_latest_record() {
        let (resolver, pointers, registry) = resolver();
        let secret = SecretKey::generate();
        let owner = Address::new("0xowner");

        let first = MutableRecord::sign(&secret, Link::raw(b"v1"), 0, TTL).unwrap();
        let name = first.name().clone();
        pointers.publish(first.clone()).await.unwrap();

        registry
            .register(&owner, &name, None, PrivacyMode::Identified)
            .await
            .unwrap();
        registry
            .bind_domain(&owner, &name, "feedback", 0)
            .await
            .unwrap();

        let resolved = resolver.resolve("feedback").await.unwrap();
        assert_eq!(resolved.pointed(), first.pointed());

        // A newer publish is reflected immediately, not a cached older one
        let second = first.next(&secret, Link::raw(b"v2"), TTL).unwrap();
        pointers.publish(second.clone()).await.unwrap();

        let resolved = resolver.resolve("feedback").await.unwrap();
        assert_eq!(resolved.pointed(), second.pointed());
        assert_eq!(resolved.sequence(), 1);
    }

    #[tokio::test]
    async fn test_unbound_domain() {
        let (resolver, _, _) = resolver();
        let result = resolver.resolve("nobody-bound-this").await;
        assert!(matches!(result, Err(ResolveError::DomainNotFound(_))));
    }

    #[tokio::test]
    async fn test_legacy_table_fallback() {
        let (resolver, pointers, _) = resolver();
        let secret = SecretKey::generate();
        let record = MutableRecord::sign(&secret, Link::raw(b"v1"), 0, TTL).unwrap();
        let name = record.name().clone();
        pointers.publish(record.clone()).await.unwrap();

        let legacy = HashMap::from([("old-form-123".to_string(), name)]);
        let resolver = resolver.with_legacy_aliases(legacy);

        // Domain-shaped identifier missing from the registry falls back to
        // the legacy table
        let resolved = resolver.resolve("old-form-123").await.unwrap();
        assert_eq!(resolved.pointed(), record.pointed());

        // Unmapped non-domain identifiers fail with the distinct legacy error
        let result = resolver.resolve("static/form?id=42").await;
        assert!(matches!(
            result,
            Err(ResolveError::UnsupportedLegacyFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_record() {
        let (resolver, pointers, _) = resolver();
        let secret = SecretKey::generate();
        // Already expired at signing time
        let record =
            MutableRecord::sign(&secret, Link::raw(b"v1"), 0, Duration::hours(-1)).unwrap();
        pointers.publish(record.clone()).await.unwrap();

        let result = resolver.resolve(record.name().as_str()).await;
        assert!(matches!(result, Err(ResolveError::RecordExpired { .. })));

        // The caller decides whether to tolerate staleness
        let tolerant = resolver.with_tolerate_stale(true);
        let resolved = tolerant.resolve(record.name().as_str()).await.unwrap();
        assert_eq!(resolved.pointed(), record.pointed());
    }

    #[tokio::test]
    async fn test_monotonicity_never_regresses() {
        let (resolver, pointers, _) = resolver();
        let secret = SecretKey::generate();

        let first = MutableRecord::sign(&secret, Link::raw(b"v1"), 0, TTL).unwrap();
        let second = first.next(&secret, Link::raw(b"v2"), TTL).unwrap();
        let name = first.name().clone();

        pointers.publish(first.clone()).await.unwrap();
        pointers.publish(second.clone()).await.unwrap();
        resolver.resolve(name.as_str()).await.unwrap();

        // Simulate a rolled-back network view serving the old record
        let rollback_view = MemoryPointerProvider::new();
        rollback_view.publish(first).await.unwrap();
        let resolver = Resolver {
            pointers: rollback_view,
            registry: resolver.registry.clone(),
            legacy: HashMap::new(),
            observed: resolver.observed.clone(),
            tolerate_stale: false,
        };

        let result = resolver.resolve_name(&name).await;
        assert!(matches!(
            result,
            Err(ResolveError::StaleRecord {
                observed: 1,
                got: 0,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_repeat_reads_of_same_record_are_fine() {
        let (resolver, pointers, _) = resolver();
        let secret = SecretKey::generate();
        let record = MutableRecord::sign(&secret, Link::raw(b"v1"), 0, TTL).unwrap();
        pointers.publish(record.clone()).await.unwrap();

        // The same record at the same sequence is not a regression
        resolver.resolve(record.name().as_str()).await.unwrap();
        resolver.resolve(record.name().as_str()).await.unwrap();
    }
}
