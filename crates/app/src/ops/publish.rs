use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use common::store::ContentStore;

use crate::op::{Op, OpContext, WalletLoadError};

/// Publish a new version of a document under its existing identity
#[derive(Args, Debug, Clone)]
pub struct Publish {
    /// Path to the new document version
    #[arg(short, long)]
    pub file: PathBuf,

    /// Path to the identity's signing key
    #[arg(short, long, default_value = "identity.pem")]
    pub key: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishOpError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("key error: {0}")]
    Key(#[from] WalletLoadError),
    #[error("publish failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl Op for Publish {
    type Error = PublishOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let data = Bytes::from(std::fs::read(&self.file)?);
        let secret = crate::op::load_key(&self.key)?;

        let record = ctx
            .state()
            .service()
            .publish_update(&secret, data)
            .await
            .map_err(|e| PublishOpError::Failed(e.to_string()))?;

        Ok(format!(
            "Published update for {}\n  document: {}\n  sequence: {}",
            record.name(),
            record.pointed(),
            record.sequence(),
        ))
    }
}
