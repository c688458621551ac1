//! Identity lifecycle flows
//!
//! Each flow is a small saga across the content store, the pointer
//! network, and the registry ledger. Steps are ordered so that a partial
//! failure leaves the system recoverable by retrying the whole flow:
//! content uploads are idempotent, publishing a duplicate sequence is
//! rejected rather than duplicated, and re-registering an identical
//! entry is a no-op.

mod create;
mod recover;
mod update;

pub use create::{CreateError, CreateReport, StepStatus};
pub use recover::{RecoverError, RotateError};
pub use update::UpdateError;

use time::Duration;

use common::linked_data::Link;
use common::pointer::{PointerError, PointerName, PointerProvider};
use common::registry::{RegistryEntry, RegistryError, RegistryProvider};
use common::store::ContentStore;
use common::vault::KeyVault;
use common::wallet::WalletSigner;

use crate::config::Config;

/// Orchestrates identity flows over a set of providers
///
/// Holds one handle per backing system plus the vault, which shares the
/// content store. Cheap to clone; providers are handles themselves.
#[derive(Debug, Clone)]
pub struct IdentityService<C: ContentStore, P: PointerProvider, R: RegistryProvider> {
    store: C,
    pointers: P,
    registry: R,
    vault: KeyVault<C>,
    record_ttl: Duration,
}

impl<C: ContentStore, P: PointerProvider, R: RegistryProvider> IdentityService<C, P, R> {
    pub fn new(store: C, pointers: P, registry: R, config: &Config) -> Self {
        let vault = KeyVault::new(store.clone());
        Self {
            store,
            pointers,
            registry,
            vault,
            record_ttl: config.record_ttl,
        }
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn pointers(&self) -> &P {
        &self.pointers
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn vault(&self) -> &KeyVault<C> {
        &self.vault
    }

    pub fn record_ttl(&self) -> Duration {
        self.record_ttl
    }

    /// Bind a human-readable domain to an identity, paying the fee
    pub async fn bind_domain(
        &self,
        signer: &dyn WalletSigner,
        name: &PointerName,
        domain: &str,
        fee: u64,
    ) -> Result<(), RegistryError<R::Error>> {
        self.registry
            .bind_domain(&signer.address(), name, domain, fee)
            .await
    }

    /// Release an identity's domain, freeing it for others
    pub async fn release_domain(
        &self,
        signer: &dyn WalletSigner,
        name: &PointerName,
    ) -> Result<(), RegistryError<R::Error>> {
        self.registry
            .release_domain(&signer.address(), name)
            .await
    }

    /// Retire or restore an identity. Retiring is a soft delete: the
    /// entry stays queryable and can be reactivated.
    pub async fn set_active(
        &self,
        signer: &dyn WalletSigner,
        name: &PointerName,
        active: bool,
    ) -> Result<(), RegistryError<R::Error>> {
        self.registry
            .set_active(&signer.address(), name, active)
            .await
    }

    pub async fn lookup_entry(
        &self,
        name: &PointerName,
    ) -> Result<RegistryEntry, RegistryError<R::Error>> {
        self.registry.lookup_entry(name).await
    }

    /// The latest record published for a name, regardless of expiry
    pub async fn latest_record(
        &self,
        name: &PointerName,
    ) -> Result<common::pointer::MutableRecord, PointerError<P::Error>> {
        self.pointers.resolve_latest(name).await
    }

    /// The latest content link published for a name
    pub async fn latest_pointed(
        &self,
        name: &PointerName,
    ) -> Result<Link, PointerError<P::Error>> {
        Ok(*self.pointers.resolve_latest(name).await?.pointed())
    }
}
