use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use common::registry::PrivacyMode;
use common::store::ContentStore;
use service::StepStatus;

use crate::op::{Op, OpContext, WalletLoadError};

/// Create a new identity for a document
#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Path to the document to publish
    #[arg(short, long)]
    pub file: PathBuf,

    /// Where to write the identity's signing key
    #[arg(short, long, default_value = "identity.pem")]
    pub key_out: PathBuf,

    /// Register without listing the wallet address publicly
    #[arg(long)]
    pub anonymous: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateOpError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletLoadError),
    #[error("create failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = CreateOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let data = Bytes::from(std::fs::read(&self.file)?);
        let wallet = ctx.wallet()?;
        let privacy = if self.anonymous {
            PrivacyMode::Anonymous
        } else {
            PrivacyMode::Identified
        };

        let report = ctx
            .state()
            .service()
            .create(data, &wallet, privacy)
            .await
            .map_err(|e| CreateOpError::Failed(e.to_string()))?;

        crate::op::write_key(&self.key_out, &report.secret)?;

        let mut out = format!(
            "Created identity: {}\n  document: {}\n  sequence: {}\n  key written to: {}",
            report.name,
            report.document,
            report.record.sequence(),
            self.key_out.display(),
        );
        if let StepStatus::Failed(reason) = &report.key_backup {
            out.push_str(&format!("\n  warning: key backup failed: {}", reason));
        }
        if let StepStatus::Failed(reason) = &report.registered {
            out.push_str(&format!("\n  warning: registration failed: {}", reason));
        }
        Ok(out)
    }
}
