//! Shared HTTP connector for all platform clients.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::{Error, Result};

/// Configuration for the shared HTTP client.
#[derive(Debug, Clone)]
#[must_use = "config does nothing unless you use it"]
pub struct HttpConfig {
    /// Per-request timeout; no other deadline is enforced.
    pub timeout: Duration,

    /// User-Agent header sent on every outbound request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("nexio-connect/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            // reqwest treats zero as "no timeout"; reject it explicitly
            // so every outbound call carries a deadline.
            return Err(Error::invalid_config("HTTP timeout must be non-zero"));
        }
        Ok(())
    }
}

/// Inner client that holds the HTTP client and configuration.
struct HttpConnectorInner {
    http: Client,
    config: HttpConfig,
}

impl std::fmt::Debug for HttpConnectorInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnectorInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Cheaply cloneable wrapper around a configured [`reqwest::Client`].
///
/// All platform clients and writers borrow this connector; there is one
/// connection pool per process.
#[derive(Clone, Debug)]
pub struct HttpConnector {
    inner: Arc<HttpConnectorInner>,
}

impl HttpConnector {
    /// Creates a new connector with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        tracing::debug!(
            timeout_ms = config.timeout.as_millis(),
            "Created HTTP connector"
        );

        Ok(Self {
            inner: Arc::new(HttpConnectorInner { http, config }),
        })
    }

    /// Creates a connector with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::default())
    }

    /// Gets the connector configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.inner.config
    }

    /// Gets the underlying HTTP client.
    pub fn http(&self) -> &Client {
        &self.inner.http
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_creation() {
        let connector = HttpConnector::with_defaults();
        assert!(connector.is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = HttpConfig {
            timeout: Duration::ZERO,
            ..HttpConfig::default()
        };
        assert!(HttpConnector::new(config).is_err());
    }
}
