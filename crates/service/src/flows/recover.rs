use std::fmt::{Debug, Display};

use common::crypto::SecretKey;
use common::linked_data::Link;
use common::pointer::{PointerName, PointerProvider};
use common::registry::{RegistryError, RegistryProvider};
use common::store::ContentStore;
use common::vault::VaultError;
use common::wallet::WalletSigner;

use super::IdentityService;

#[derive(Debug, thiserror::Error)]
pub enum RecoverError<CE: Display + Debug, RE> {
    #[error("registry lookup failed: {0}")]
    Registry(#[from] RegistryError<RE>),
    /// The identity is registered but never backed its key up
    #[error("no key backup on record for {0}")]
    NoBackup(PointerName),
    #[error("vault recovery failed: {0}")]
    Vault(#[from] VaultError<CE>),
}

#[derive(Debug, thiserror::Error)]
pub enum RotateError<CE: Display + Debug, RE> {
    #[error("vault rotation failed: {0}")]
    Vault(#[from] VaultError<CE>),
    /// The fresh blob was uploaded but the registry still references the
    /// old locator; safe to retry, both blobs remain restorable
    #[error("failed to record new key locator: {0}")]
    Registry(#[from] RegistryError<RE>),
}

impl<C: ContentStore, P: PointerProvider, R: RegistryProvider> IdentityService<C, P, R> {
    /// Recover an identity's signing key on a new device
    ///
    /// Looks the key locator up in the registry and decrypts the blob
    /// with the wallet-derived key. Only the original wallet can do
    /// this; anyone else fails decryption.
    pub async fn recover(
        &self,
        name: &PointerName,
        signer: &dyn WalletSigner,
    ) -> Result<SecretKey, RecoverError<C::Error, R::Error>> {
        let entry = self.registry.lookup_entry(name).await?;
        let locator = entry
            .encrypted_key_locator
            .ok_or_else(|| RecoverError::NoBackup(name.clone()))?;

        let secret = self.vault.restore(&locator, name, signer).await?;
        tracing::info!(%name, "key recovered");
        Ok(secret)
    }

    /// Re-encrypt the key under a fresh wrapper and point the registry at
    /// the new blob
    pub async fn rotate_backup(
        &self,
        secret: &SecretKey,
        signer: &dyn WalletSigner,
    ) -> Result<Link, RotateError<C::Error, R::Error>> {
        let name = PointerName::from_public_key(&secret.public());
        let locator = self.vault.rotate(secret, signer).await?;
        self.registry
            .update_key_locator(&signer.address(), &name, locator)
            .await?;
        tracing::info!(%name, %locator, "key backup rotated");
        Ok(locator)
    }
}
