use std::fmt::{Debug, Display};

use async_trait::async_trait;

use super::{PrivacyMode, RegistryEntry};
use crate::linked_data::Link;
use crate::pointer::PointerName;
use crate::wallet::Address;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError<T> {
    #[error("unhandled registry provider error: {0}")]
    Provider(#[from] T),
    /// The mutable name is already registered by a different owner
    #[error("name already registered by a different owner")]
    AlreadyExists,
    /// The domain is already bound to another identity
    #[error("domain already bound: {0}")]
    DomainTaken(String),
    /// The offered fee does not cover the configured binding fee
    #[error("insufficient fee: required {required}, offered {offered}")]
    InsufficientFee { required: u64, offered: u64 },
    /// The caller does not own the entry. Not recoverable by retrying;
    /// surfaced to the user.
    #[error("caller does not own this entry")]
    NotOwner,
    /// No entry is registered under this name
    #[error("entry not found: {0}")]
    NotFound(PointerName),
    /// No identity is bound to this domain
    #[error("domain not found: {0}")]
    DomainNotFound(String),
}

/// The registry ledger's state-transition and read calls
///
/// Writes are authorized against the ledger's notion of ownership: the
/// `owner` argument is the authenticated caller, and a deployed provider
/// submits each write signed by that owner's credential. Writes incur a
/// confirmation delay and, for domain binding, a fee; reads are free.
#[async_trait]
pub trait RegistryProvider: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug;

    /// One-time binding of an owner to a mutable name
    ///
    /// Should fail with `Err(RegistryError::AlreadyExists)` if the name is
    /// held by a different owner. An identical re-register by the same
    /// owner is an idempotent no-op so a failed creation saga can be
    /// retried from the beginning.
    async fn register(
        &self,
        owner: &Address,
        name: &PointerName,
        encrypted_key_locator: Option<Link>,
        privacy: PrivacyMode,
    ) -> Result<(), RegistryError<Self::Error>>;

    /// Bind a human-readable domain to a name, paying the configured fee
    ///
    /// Enforces the global uniqueness invariant: at most one active
    /// binding per domain string. Should fail with `DomainTaken`,
    /// `InsufficientFee`, or `NotOwner` accordingly.
    async fn bind_domain(
        &self,
        owner: &Address,
        name: &PointerName,
        domain: &str,
        fee: u64,
    ) -> Result<(), RegistryError<Self::Error>>;

    /// Release the entry's domain, freeing it for re-registration by anyone
    async fn release_domain(
        &self,
        owner: &Address,
        name: &PointerName,
    ) -> Result<(), RegistryError<Self::Error>>;

    /// Soft delete / restore. `active = false` retires the identity; the
    /// entry and its history remain queryable.
    async fn set_active(
        &self,
        owner: &Address,
        name: &PointerName,
        active: bool,
    ) -> Result<(), RegistryError<Self::Error>>;

    /// Record a new encrypted-key locator after rotation or backup re-upload
    async fn update_key_locator(
        &self,
        owner: &Address,
        name: &PointerName,
        locator: Link,
    ) -> Result<(), RegistryError<Self::Error>>;

    /// Resolve a domain to the name it is bound to
    async fn lookup_by_domain(
        &self,
        domain: &str,
    ) -> Result<PointerName, RegistryError<Self::Error>>;

    /// Fetch the full entry for a name
    async fn lookup_entry(
        &self,
        name: &PointerName,
    ) -> Result<RegistryEntry, RegistryError<Self::Error>>;

    /// The configured fee for binding a domain
    fn domain_fee(&self) -> u64;
}
