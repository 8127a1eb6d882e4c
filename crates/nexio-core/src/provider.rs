//! Injected OAuth provider configuration.
//!
//! Client credentials are loaded at process start and passed explicitly
//! to each component; there is no global mutable state.

use serde::{Deserialize, Serialize};

use crate::Platform;

/// OAuth2 client configuration for a single platform.
#[must_use = "config does nothing unless you use it"]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The platform this configuration belongs to.
    pub platform: Platform,

    /// OAuth2 client identifier issued by the platform.
    pub client_id: String,

    /// OAuth2 client secret issued by the platform.
    pub client_secret: String,

    /// Callback URL registered with the platform.
    pub redirect_uri: String,

    /// Space-separated scope string; empty when the platform does not
    /// use scopes (Notion grants are workspace-wide).
    pub scopes: String,

    /// Authorization endpoint (GET redirect).
    pub authorize_endpoint: String,

    /// Token exchange endpoint (POST).
    pub token_endpoint: String,
}

impl ProviderConfig {
    /// Creates a configuration with the platform's default endpoints
    /// and scopes.
    pub fn new(
        platform: Platform,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        let (authorize_endpoint, token_endpoint, scopes) = match platform {
            Platform::HubSpot => (
                "https://app.hubspot.com/oauth/authorize",
                "https://api.hubapi.com/oauth/v1/token",
                "oauth crm.objects.companies.read crm.objects.contacts.read",
            ),
            Platform::Notion => (
                "https://api.notion.com/v1/oauth/authorize",
                "https://api.notion.com/v1/oauth/token",
                "",
            ),
            Platform::Airtable => (
                "https://airtable.com/oauth2/v1/authorize",
                "https://airtable.com/oauth2/v1/token",
                "data.records:write schema.bases:read",
            ),
        };

        Self {
            platform,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: scopes.to_string(),
            authorize_endpoint: authorize_endpoint.to_string(),
            token_endpoint: token_endpoint.to_string(),
        }
    }

    /// Overrides the authorization endpoint (regional portals, tests).
    pub fn with_authorize_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorize_endpoint = endpoint.into();
        self
    }

    /// Overrides the token endpoint (tests).
    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }
}

/// Fixed destination identifiers for cross-platform transfers.
///
/// The document writer appends to one Notion page; the tabular writer
/// creates records in one Airtable table.
#[must_use = "config does nothing unless you use it"]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferTargets {
    /// Notion page that receives appended content blocks.
    pub notion_page_id: String,

    /// Airtable base that receives created records.
    pub airtable_base_id: String,

    /// Airtable table (within the base) that receives created records.
    pub airtable_table_id: String,
}
