//! Application state and dependency injection.

use anyhow::{Context, Result as AnyhowResult};
use nexio_connect::HttpConnector;
use nexio_nats::{NatsClient, NatsConfig};

use crate::service::{Integrations, ServiceConfig};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    nats_client: NatsClient,
    http_connector: HttpConnector,
    integrations: Integrations,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the NATS server and builds the shared HTTP connector
    /// and provider registry.
    pub async fn from_config(
        config: &ServiceConfig,
        nats_config: NatsConfig,
    ) -> AnyhowResult<Self> {
        config.validate()?;

        let nats_client = NatsClient::connect(nats_config)
            .await
            .context("Failed to connect to NATS")?;
        let http_connector =
            HttpConnector::with_defaults().context("Failed to create HTTP connector")?;

        Ok(Self {
            nats_client,
            http_connector,
            integrations: Integrations::from_config(config),
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(nats_client: NatsClient);
impl_di!(http_connector: HttpConnector);
impl_di!(integrations: Integrations);
