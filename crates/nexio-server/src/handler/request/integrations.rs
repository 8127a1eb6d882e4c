//! Request types for the integration handlers.

use nexio_core::Platform;
use schemars::JsonSchema;
use serde::Deserialize;

/// Body for starting an OAuth2 authorization flow.
#[must_use]
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AuthorizeRequest {
    /// Identifier of the user starting the flow.
    pub user_id: String,
    /// Identifier of the user's organization.
    pub org_id: String,
}

/// Body for retrieving cached credentials.
#[must_use]
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CredentialsRequest {
    pub user_id: String,
    pub org_id: String,
}

/// Body for fetching and normalizing platform items.
#[must_use]
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LoadRequest {
    pub user_id: String,
    pub org_id: String,
    /// Raw token payload, as returned by the credentials endpoint.
    pub credentials: serde_json::Value,
}

/// Body for transferring cached items to another platform.
#[must_use]
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TransferRequest {
    pub user_id: String,
    pub org_id: String,
    /// Platform that receives the items.
    pub destination: Platform,
    /// Raw token payload for the destination platform.
    pub destination_credentials: serde_json::Value,
}

/// Query parameters the platform appends to the OAuth2 callback.
///
/// All fields are optional at the wire level; the handler decides which
/// absences are errors.
#[must_use]
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CallbackParams {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// Echoed state blob from the authorization URL.
    pub state: Option<String>,
    /// Error code when the user denied authorization.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_request_parses_destination() {
        let request: TransferRequest = serde_json::from_str(
            r#"{
                "user_id": "u1",
                "org_id": "o1",
                "destination": "notion",
                "destination_credentials": {"access_token": "tok"}
            }"#,
        )
        .unwrap();
        assert_eq!(request.destination, Platform::Notion);
    }

    #[test]
    fn callback_params_all_optional() {
        let params: CallbackParams = serde_json::from_str("{}").unwrap();
        assert!(params.code.is_none());
        assert!(params.state.is_none());
        assert!(params.error.is_none());
    }
}
