//! Lightweight test harness for identity lifecycle tests
//!
//! Wires the in-memory content store, pointer network, and registry
//! ledger together so integration tests can exercise full create /
//! publish / resolve / recover sequences without external infrastructure.

use crate::pointer::MemoryPointerProvider;
use crate::registry::MemoryRegistryProvider;
use crate::resolver::Resolver;
use crate::store::MemoryContentStore;
use crate::vault::KeyVault;
use crate::wallet::LocalWalletSigner;

#[derive(Debug, Clone, Default)]
pub struct TestEnv {
    store: MemoryContentStore,
    pointers: MemoryPointerProvider,
    registry: MemoryRegistryProvider,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment whose registry charges a domain binding fee
    pub fn with_domain_fee(fee: u64) -> Self {
        Self {
            store: MemoryContentStore::new(),
            pointers: MemoryPointerProvider::new(),
            registry: MemoryRegistryProvider::new(fee),
        }
    }

    pub fn store(&self) -> &MemoryContentStore {
        &self.store
    }

    pub fn pointers(&self) -> &MemoryPointerProvider {
        &self.pointers
    }

    pub fn registry(&self) -> &MemoryRegistryProvider {
        &self.registry
    }

    pub fn vault(&self) -> KeyVault<MemoryContentStore> {
        KeyVault::new(self.store.clone())
    }

    /// A fresh resolver over this environment's providers
    pub fn resolver(&self) -> Resolver<MemoryPointerProvider, MemoryRegistryProvider> {
        Resolver::new(self.pointers.clone(), self.registry.clone())
    }

    /// A fresh deterministic wallet signer
    pub fn wallet() -> LocalWalletSigner {
        LocalWalletSigner::generate()
    }
}
