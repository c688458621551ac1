//! # Key Recovery Vault
//!
//! Wallet-derived encrypted backup of a mutable pointer's signing key,
//! enabling any of the owner's devices to recover the key without a
//! central server holding secrets.
//!
//! ## Derivation
//!
//! The vault asks the wallet to sign a fixed, deterministic message that
//! embeds the pointer name and a constant purpose string, so the same
//! wallet deriving a key for a different identity gets a different key.
//! The symmetric wrap key is HKDF-SHA256 over that signature. Because the
//! signing scheme is deterministic, the same wallet always re-derives the
//! same key with no prior state.
//!
//! ## Boundaries
//!
//! Neither the raw private key nor the raw wallet signature is ever
//! transmitted: the content store only sees ciphertext, the signer only
//! sees the fixed message.

use std::fmt::{Debug, Display};

use bytes::Bytes;
use hkdf::Hkdf;
use sha2::Sha256;

use crate::crypto::{Secret, SecretKey, PRIVATE_KEY_SIZE, SECRET_SIZE};
use crate::linked_data::Link;
use crate::pointer::PointerName;
use crate::store::{ContentStore, StoreError};
use crate::wallet::{WalletError, WalletSigner};

/// Constant purpose string embedded in the derivation message
pub const VAULT_PURPOSE: &str = "formid-key-vault:v1";
/// HKDF info domain separator
const VAULT_HKDF_INFO: &str = "formid:vault:v1";

#[derive(Debug, thiserror::Error)]
pub enum VaultError<T: Display + Debug> {
    #[error("wallet signer error: {0}")]
    Signer(#[from] WalletError),
    #[error("failed to upload key blob: {0}")]
    Upload(StoreError<T>),
    /// The ciphertext blob could not be fetched. Distinct from
    /// [`VaultError::DecryptionFailed`]: the backup may still exist.
    #[error("failed to fetch key blob: {0}")]
    Fetch(StoreError<T>),
    /// Wrong wallet, or the ciphertext failed authentication. Never
    /// returns garbage key material silently.
    #[error("decryption failed: wrong wallet or corrupted key blob")]
    DecryptionFailed,
    /// The decrypted key does not derive the expected pointer name
    #[error("recovered key does not derive pointer name {0}")]
    KeyMismatch(PointerName),
    #[error("key derivation error: {0}")]
    Derivation(String),
    #[error("key wrap error: {0}")]
    Wrap(String),
}

/// The fixed message the wallet signs to derive a vault key
///
/// Embeds the pointer name so each identity derives a distinct key under
/// the same wallet.
pub fn derivation_message(name: &PointerName) -> Vec<u8> {
    format!("{}:{}", VAULT_PURPOSE, name).into_bytes()
}

fn derive_secret(signature: &[u8], name: &PointerName) -> Result<Secret, String> {
    let hk = Hkdf::<Sha256>::new(None, signature);
    let info = format!("{}:{}", VAULT_HKDF_INFO, name);
    let mut okm = [0u8; SECRET_SIZE];
    hk.expand(info.as_bytes(), &mut okm)
        .map_err(|e| format!("hkdf expand: {}", e))?;
    Ok(Secret::from(okm))
}

/// Encrypted backup and recovery of pointer signing keys
#[derive(Debug, Clone)]
pub struct KeyVault<S: ContentStore> {
    store: S,
}

impl<S: ContentStore> KeyVault<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn wrap_key(
        &self,
        name: &PointerName,
        signer: &dyn WalletSigner,
    ) -> Result<Secret, VaultError<S::Error>> {
        let message = derivation_message(name);
        let signature = signer.sign(&message).await?;
        derive_secret(&signature, name).map_err(VaultError::Derivation)
    }

    /// Encrypt the pointer's private key under the wallet-derived wrap key
    /// and upload the ciphertext, returning its locator
    pub async fn backup(
        &self,
        secret: &SecretKey,
        signer: &dyn WalletSigner,
    ) -> Result<Link, VaultError<S::Error>> {
        let name = PointerName::from_public_key(&secret.public());
        let wrap = self.wrap_key(&name, signer).await?;

        let ciphertext = wrap
            .encrypt(&secret.to_bytes())
            .map_err(|e| VaultError::Wrap(e.to_string()))?;

        let locator = self
            .store
            .put(Bytes::from(ciphertext))
            .await
            .map_err(VaultError::Upload)?;

        tracing::debug!(%name, %locator, "key blob uploaded");
        Ok(locator)
    }

    /// Recover the pointer's private key on a new device
    ///
    /// Re-derives the identical message, signature, and wrap key, then
    /// fetches and decrypts the blob.
    ///
    /// # Errors
    ///
    /// * [`VaultError::Fetch`] - the blob could not be retrieved
    /// * [`VaultError::DecryptionFailed`] - wrong wallet or corrupted
    ///   ciphertext; surfaced distinctly from fetch failures
    /// * [`VaultError::KeyMismatch`] - the blob decrypted but holds a key
    ///   for a different identity
    pub async fn restore(
        &self,
        locator: &Link,
        name: &PointerName,
        signer: &dyn WalletSigner,
    ) -> Result<SecretKey, VaultError<S::Error>> {
        let wrap = self.wrap_key(name, signer).await?;

        let ciphertext = self.store.get(locator).await.map_err(VaultError::Fetch)?;

        let plaintext = wrap
            .decrypt(&ciphertext)
            .map_err(|_| VaultError::DecryptionFailed)?;
        if plaintext.len() != PRIVATE_KEY_SIZE {
            return Err(VaultError::DecryptionFailed);
        }

        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        bytes.copy_from_slice(&plaintext);
        let secret = SecretKey::from(bytes);

        if PointerName::from_public_key(&secret.public()) != *name {
            return Err(VaultError::KeyMismatch(name.clone()));
        }
        Ok(secret)
    }

    /// Re-encrypt the same keypair under a freshly derived wrapper
    ///
    /// Rotation here replaces the wrapper, not the signing keypair: a
    /// fresh nonce (and, across versions, a fresh message format) yields a
    /// new blob while the identity keeps its name. True key replacement
    /// would mint a new pointer identity and is out of scope. The old
    /// blob is not deleted, simply unreferenced once the registry locator
    /// is updated.
    pub async fn rotate(
        &self,
        secret: &SecretKey,
        signer: &dyn WalletSigner,
    ) -> Result<Link, VaultError<S::Error>> {
        self.backup(secret, signer).await
    }
}
