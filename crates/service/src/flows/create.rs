use bytes::Bytes;

use common::crypto::SecretKey;
use common::linked_data::Link;
use common::pointer::{MutableRecord, PointerError, PointerName, PointerProvider, RecordError};
use common::registry::{PrivacyMode, RegistryProvider};
use common::store::{ContentStore, StoreError};
use common::wallet::WalletSigner;

use super::IdentityService;

#[derive(Debug, thiserror::Error)]
pub enum CreateError<CE, PE> {
    #[error("failed to upload document: {0}")]
    Upload(StoreError<CE>),
    #[error("failed to build record: {0}")]
    Record(#[from] RecordError),
    #[error("failed to publish record: {0}")]
    Publish(PointerError<PE>),
}

/// Outcome of one best-effort saga step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    /// The step failed; the flow continued and the failure is reported
    /// here so the caller can retry it later
    Failed(String),
}

impl StepStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepStatus::Completed)
    }
}

/// Everything a caller needs after creating an identity
///
/// The first three steps (upload, sign, publish) must succeed or the
/// whole flow fails. Key backup and registration are best-effort: the
/// identity is already live on the pointer network, so their failures
/// are reported rather than thrown, and both can be retried.
#[derive(Debug)]
pub struct CreateReport {
    pub name: PointerName,
    pub secret: SecretKey,
    pub document: Link,
    pub record: MutableRecord,
    pub key_locator: Option<Link>,
    pub key_backup: StepStatus,
    pub registered: StepStatus,
}

impl<C: ContentStore, P: PointerProvider, R: RegistryProvider> IdentityService<C, P, R> {
    /// Create a brand new identity for a document
    ///
    /// Generates a fresh keypair, uploads the document, publishes the
    /// sequence 0 record, backs the key up in the vault, and registers
    /// the identity in the ledger.
    pub async fn create(
        &self,
        data: Bytes,
        signer: &dyn WalletSigner,
        privacy: PrivacyMode,
    ) -> Result<CreateReport, CreateError<C::Error, P::Error>> {
        let secret = SecretKey::generate();
        self.create_with_key(secret, data, signer, privacy).await
    }

    /// Create an identity with a caller-supplied keypair
    ///
    /// Retry-safe: uploading identical bytes yields the same link, and a
    /// sequence 0 record that is already on the network (pointing at the
    /// same document) is accepted as already published instead of failing.
    pub async fn create_with_key(
        &self,
        secret: SecretKey,
        data: Bytes,
        signer: &dyn WalletSigner,
        privacy: PrivacyMode,
    ) -> Result<CreateReport, CreateError<C::Error, P::Error>> {
        let name = PointerName::from_public_key(&secret.public());

        let document = self
            .store
            .put(data)
            .await
            .map_err(CreateError::Upload)?;

        let record = MutableRecord::sign(&secret, document, 0, self.record_ttl)?;
        let record = self.publish_initial(record).await?;
        tracing::info!(%name, %document, "identity created");

        // Past this point the identity is live; remaining steps are
        // best-effort and reported in the result
        let (key_locator, key_backup) = match self.vault.backup(&secret, signer).await {
            Ok(locator) => (Some(locator), StepStatus::Completed),
            Err(e) => {
                tracing::warn!(%name, error = %e, "key backup failed");
                (None, StepStatus::Failed(e.to_string()))
            }
        };

        let registered = match self
            .registry
            .register(&signer.address(), &name, key_locator, privacy)
            .await
        {
            Ok(()) => StepStatus::Completed,
            Err(e) => {
                tracing::warn!(%name, error = %e, "registration failed");
                StepStatus::Failed(e.to_string())
            }
        };

        Ok(CreateReport {
            name,
            secret,
            document,
            record,
            key_locator,
            key_backup,
            registered,
        })
    }

    /// Publish a sequence 0 record, tolerating an identical one already
    /// on the network
    async fn publish_initial(
        &self,
        record: MutableRecord,
    ) -> Result<MutableRecord, CreateError<C::Error, P::Error>> {
        match self.pointers.publish(record.clone()).await {
            Ok(()) => Ok(record),
            Err(PointerError::StaleSequence { .. }) => {
                // A previous attempt may have gotten this far; accept the
                // existing record if it points at the same document
                let existing = self
                    .pointers
                    .resolve_latest(record.name())
                    .await
                    .map_err(CreateError::Publish)?;
                if existing.sequence() == record.sequence()
                    && existing.pointed() == record.pointed()
                {
                    Ok(existing)
                } else {
                    Err(CreateError::Publish(PointerError::StaleSequence {
                        name: record.name().clone(),
                        have: existing.sequence(),
                        tried: record.sequence(),
                    }))
                }
            }
            Err(e) => Err(CreateError::Publish(e)),
        }
    }
}
