use common::pointer::MemoryPointerProvider;
use common::registry::MemoryRegistryProvider;
use common::resolver::Resolver;
use common::store::{ContentStore, HttpContentStore, MemoryContentStore};

use crate::config::Config;
use crate::flows::IdentityService;

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    /// `with_gateway` was requested but the config names no gateway URL
    #[error("no gateway url configured")]
    MissingGatewayUrl,
}

/// Everything a running formid instance holds
///
/// The pointer network and registry are backed by the in-process
/// providers; the content store is generic so the same state can run
/// against the in-memory store or an HTTP gateway.
#[derive(Debug, Clone)]
pub struct State<C: ContentStore = MemoryContentStore> {
    service: IdentityService<C, MemoryPointerProvider, MemoryRegistryProvider>,
    resolver: Resolver<MemoryPointerProvider, MemoryRegistryProvider>,
}

impl<C: ContentStore> State<C> {
    fn build(store: C, config: &Config) -> Self {
        let pointers = MemoryPointerProvider::new();
        let registry = MemoryRegistryProvider::new(config.domain_fee);

        let resolver = Resolver::new(pointers.clone(), registry.clone())
            .with_legacy_aliases(config.legacy_aliases.clone())
            .with_tolerate_stale(config.tolerate_stale);
        let service = IdentityService::new(store, pointers, registry, config);

        Self { service, resolver }
    }

    pub fn service(&self) -> &IdentityService<C, MemoryPointerProvider, MemoryRegistryProvider> {
        &self.service
    }

    pub fn resolver(&self) -> &Resolver<MemoryPointerProvider, MemoryRegistryProvider> {
        &self.resolver
    }
}

impl State<MemoryContentStore> {
    /// State over the in-memory content store
    pub fn from_config(config: &Config) -> Self {
        Self::build(MemoryContentStore::new(), config)
    }
}

impl State<HttpContentStore> {
    /// State whose content store is an HTTP gateway
    pub fn with_gateway(config: &Config) -> Result<Self, StateSetupError> {
        let url = config
            .gateway_url
            .clone()
            .ok_or(StateSetupError::MissingGatewayUrl)?;
        tracing::debug!(%url, "using http content store");
        Ok(Self::build(HttpContentStore::new(url), config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use common::registry::PrivacyMode;
    use common::testkit::TestEnv;

    #[tokio::test]
    async fn test_state_shares_providers_with_resolver() {
        let state = State::from_config(&Config::default());
        let wallet = TestEnv::wallet();

        let report = state
            .service()
            .create(Bytes::from_static(b"form v1"), &wallet, PrivacyMode::Identified)
            .await
            .unwrap();

        // The resolver sees what the service published
        let resolved = state.resolver().resolve(report.name.as_str()).await.unwrap();
        assert_eq!(resolved.pointed(), &report.document);
    }

    #[test]
    fn test_with_gateway_requires_url() {
        let result = State::with_gateway(&Config::default());
        assert!(matches!(result, Err(StateSetupError::MissingGatewayUrl)));
    }

    #[test]
    fn test_with_gateway_from_config_url() {
        let config = Config {
            gateway_url: Some("http://localhost:8080".parse().unwrap()),
            ..Config::default()
        };
        assert!(State::with_gateway(&config).is_ok());
    }
}
