//! Response types for the integration handlers.

use schemars::JsonSchema;
use serde::Serialize;

/// Response for a started authorization flow.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AuthorizeResponse {
    /// Authorization URL the client should redirect the user to.
    pub url: String,
}
