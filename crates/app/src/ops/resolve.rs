use clap::Args;

use common::store::ContentStore;

use crate::op::{Op, OpContext};

/// Resolve an identifier (pointer name or domain) to its latest document
#[derive(Args, Debug, Clone)]
pub struct Resolve {
    /// Pointer name, custom domain, or legacy alias
    pub identifier: String,

    /// Also fetch and print the document content
    #[arg(long)]
    pub fetch: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveOpError {
    #[error("resolution failed: {0}")]
    Failed(String),
    #[error("failed to fetch document: {0}")]
    Fetch(String),
}

#[async_trait::async_trait]
impl Op for Resolve {
    type Error = ResolveOpError;
    type Output = String;

    async fn execute<C: ContentStore>(
        &self,
        ctx: &OpContext<C>,
    ) -> Result<Self::Output, Self::Error> {
        let resolved = ctx
            .state()
            .resolver()
            .resolve(&self.identifier)
            .await
            .map_err(|e| ResolveOpError::Failed(e.to_string()))?;

        let mut out = format!(
            "{}\n  document: {}\n  sequence: {}",
            resolved.name(),
            resolved.pointed(),
            resolved.sequence(),
        );

        if self.fetch {
            let data = ctx
                .state()
                .service()
                .store()
                .get(resolved.pointed())
                .await
                .map_err(|e| ResolveOpError::Fetch(e.to_string()))?;
            out.push_str("\n---\n");
            out.push_str(&String::from_utf8_lossy(&data));
        }
        Ok(out)
    }
}
