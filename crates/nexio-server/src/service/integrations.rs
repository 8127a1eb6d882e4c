//! Per-platform OAuth provider registry.

use std::collections::HashMap;
use std::sync::Arc;

use nexio_connect::{HttpConnector, OAuthFlow};
use nexio_core::{Platform, ProviderConfig, TransferTargets};
use strum::IntoEnumIterator;

use crate::service::ServiceConfig;

/// Registry of provider configurations and transfer targets.
///
/// Built once at startup from [`ServiceConfig`]; every supported
/// platform has an entry, so lookups are infallible.
#[must_use = "registry does nothing unless you use it"]
#[derive(Clone)]
pub struct Integrations {
    inner: Arc<IntegrationsInner>,
}

struct IntegrationsInner {
    providers: HashMap<Platform, ProviderConfig>,
    transfer_targets: TransferTargets,
}

impl Integrations {
    /// Builds the registry from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let providers = Platform::iter()
            .map(|platform| (platform, config.provider_config(platform)))
            .collect();

        Self {
            inner: Arc::new(IntegrationsInner {
                providers,
                transfer_targets: config.transfer_targets(),
            }),
        }
    }

    /// Returns the provider configuration for a platform.
    pub fn provider(&self, platform: Platform) -> &ProviderConfig {
        &self.inner.providers[&platform]
    }

    /// Returns the fixed transfer destination identifiers.
    pub fn transfer_targets(&self) -> &TransferTargets {
        &self.inner.transfer_targets
    }

    /// Creates an OAuth flow for the platform over the shared connector.
    pub fn flow(&self, platform: Platform, connector: &HttpConnector) -> OAuthFlow {
        OAuthFlow::new(connector.clone(), self.provider(platform).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_platform_is_registered() {
        let registry = Integrations::from_config(&ServiceConfig::default());
        for platform in Platform::iter() {
            assert_eq!(registry.provider(platform).platform, platform);
        }
    }

    #[test]
    fn redirect_uri_is_platform_scoped() {
        let registry = Integrations::from_config(&ServiceConfig::default());
        let hubspot = registry.provider(Platform::HubSpot);
        assert!(hubspot.redirect_uri.ends_with("/integrations/hubspot/oauth2callback"));
    }
}
