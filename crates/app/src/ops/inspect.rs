use clap::Args;

use common::pointer::PointerName;
use common::registry::PrivacyMode;
use common::store::ContentStore;

use crate::op::{Op, OpContext};

/// Show an identity's registry entry and latest record
#[derive(Args, Debug, Clone)]
pub struct Inspect {
    /// The identity's pointer name
    pub name: PointerName,
}

#[derive(Debug, thiserror::Error)]
pub enum InspectOpError {
    #[error("inspect failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl Op for Inspect {
    type Error = InspectOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let service = ctx.state().service();
        let entry = service
            .lookup_entry(&self.name)
            .await
            .map_err(|e| InspectOpError::Failed(e.to_string()))?;

        let owner = match entry.privacy {
            PrivacyMode::Identified => entry.owner.to_string(),
            PrivacyMode::Anonymous => "(anonymous)".to_string(),
        };
        let mut out = format!(
            "{}\n  owner: {}\n  active: {}\n  domain: {}\n  key backup: {}",
            self.name,
            owner,
            entry.active,
            entry.custom_domain.as_deref().unwrap_or("(none)"),
            entry
                .encrypted_key_locator
                .map(|l| l.to_string())
                .unwrap_or_else(|| "(none)".to_string()),
        );

        match service.latest_record(&self.name).await {
            Ok(record) => {
                out.push_str(&format!(
                    "\n  latest sequence: {}\n  latest document: {}\n  expired: {}",
                    record.sequence(),
                    record.pointed(),
                    record.is_expired(),
                ));
            }
            Err(_) => out.push_str("\n  no record published"),
        }
        Ok(out)
    }
}
