use anyhow::{Result as AnyhowResult, anyhow};
use nexio_core::{Platform, ProviderConfig, TransferTargets};
use serde::{Deserialize, Serialize};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Public base URL of this service, used to build per-platform
    /// OAuth redirect URIs.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "NEXIO_PUBLIC_URL", default_value = "http://localhost:8000")
    )]
    pub public_url: String,

    /// HubSpot OAuth2 client identifier.
    #[cfg_attr(feature = "config", arg(long, env = "HUBSPOT_CLIENT_ID", default_value = ""))]
    pub hubspot_client_id: String,

    /// HubSpot OAuth2 client secret.
    #[cfg_attr(feature = "config", arg(long, env = "HUBSPOT_CLIENT_SECRET", default_value = ""))]
    pub hubspot_client_secret: String,

    /// Notion OAuth2 client identifier.
    #[cfg_attr(feature = "config", arg(long, env = "NOTION_CLIENT_ID", default_value = ""))]
    pub notion_client_id: String,

    /// Notion OAuth2 client secret.
    #[cfg_attr(feature = "config", arg(long, env = "NOTION_CLIENT_SECRET", default_value = ""))]
    pub notion_client_secret: String,

    /// Airtable OAuth2 client identifier.
    #[cfg_attr(feature = "config", arg(long, env = "AIRTABLE_CLIENT_ID", default_value = ""))]
    pub airtable_client_id: String,

    /// Airtable OAuth2 client secret.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "AIRTABLE_CLIENT_SECRET", default_value = "")
    )]
    pub airtable_client_secret: String,

    /// Notion page that receives transferred items.
    #[cfg_attr(feature = "config", arg(long, env = "NOTION_PAGE_ID", default_value = ""))]
    pub notion_page_id: String,

    /// Airtable base that receives transferred items.
    #[cfg_attr(feature = "config", arg(long, env = "AIRTABLE_BASE_ID", default_value = ""))]
    pub airtable_base_id: String,

    /// Airtable table (within the base) that receives transferred items.
    #[cfg_attr(feature = "config", arg(long, env = "AIRTABLE_TABLE_ID", default_value = ""))]
    pub airtable_table_id: String,
}

impl ServiceConfig {
    /// Validates all configuration values and returns errors for
    /// invalid settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the public URL is not a valid HTTP(S) URL or
    /// any platform is missing its client credentials.
    pub fn validate(&self) -> AnyhowResult<()> {
        if !self.public_url.starts_with("http://") && !self.public_url.starts_with("https://") {
            return Err(anyhow!("Public URL must start with 'http://' or 'https://'"));
        }

        let credentials = [
            ("HubSpot", &self.hubspot_client_id, &self.hubspot_client_secret),
            ("Notion", &self.notion_client_id, &self.notion_client_secret),
            (
                "Airtable",
                &self.airtable_client_id,
                &self.airtable_client_secret,
            ),
        ];
        for (platform, client_id, client_secret) in credentials {
            if client_id.is_empty() {
                return Err(anyhow!("{platform} client ID cannot be empty"));
            }
            if client_secret.is_empty() {
                return Err(anyhow!("{platform} client secret cannot be empty"));
            }
        }

        Ok(())
    }

    /// Returns the OAuth redirect URI registered for a platform.
    pub fn redirect_uri(&self, platform: Platform) -> String {
        format!(
            "{}/integrations/{}/oauth2callback",
            self.public_url.trim_end_matches('/'),
            platform
        )
    }

    /// Builds the provider configuration for a platform.
    pub fn provider_config(&self, platform: Platform) -> ProviderConfig {
        let (client_id, client_secret) = match platform {
            Platform::HubSpot => (&self.hubspot_client_id, &self.hubspot_client_secret),
            Platform::Notion => (&self.notion_client_id, &self.notion_client_secret),
            Platform::Airtable => (&self.airtable_client_id, &self.airtable_client_secret),
        };

        ProviderConfig::new(
            platform,
            client_id,
            client_secret,
            self.redirect_uri(platform),
        )
    }

    /// Returns the configured transfer destination identifiers.
    pub fn transfer_targets(&self) -> TransferTargets {
        TransferTargets {
            notion_page_id: self.notion_page_id.clone(),
            airtable_base_id: self.airtable_base_id.clone(),
            airtable_table_id: self.airtable_table_id.clone(),
        }
    }
}

#[cfg(debug_assertions)]
impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            public_url: "http://localhost:8000".to_owned(),
            hubspot_client_id: "hubspot-client-id".to_owned(),
            hubspot_client_secret: "hubspot-client-secret".to_owned(),
            notion_client_id: "notion-client-id".to_owned(),
            notion_client_secret: "notion-client-secret".to_owned(),
            airtable_client_id: "airtable-client-id".to_owned(),
            airtable_client_secret: "airtable-client-secret".to_owned(),
            notion_page_id: "page-id".to_owned(),
            airtable_base_id: "base-id".to_owned(),
            airtable_table_id: "table-id".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let config = ServiceConfig {
            notion_client_secret: String::new(),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn redirect_uri_strips_trailing_slash() {
        let config = ServiceConfig {
            public_url: "https://api.example.com/".to_owned(),
            ..ServiceConfig::default()
        };
        assert_eq!(
            config.redirect_uri(Platform::Notion),
            "https://api.example.com/integrations/notion/oauth2callback"
        );
    }
}
