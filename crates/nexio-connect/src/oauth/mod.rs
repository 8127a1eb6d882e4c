//! OAuth2 authorization-code flow: state blobs, authorization URLs,
//! and code-for-token exchange.

mod flow;
mod state;

pub use flow::{AuthorizeUrl, OAuthFlow};
pub use state::AuthState;

use crate::{Error, Result};

/// Extracts the bearer access token from a raw token payload.
///
/// Token payloads are cached verbatim; a payload without an
/// `access_token` field is unusable and treated the same as a cache
/// miss.
pub fn access_token(credentials: &serde_json::Value) -> Result<&str> {
    credentials
        .get("access_token")
        .and_then(serde_json::Value::as_str)
        .ok_or(Error::CredentialsNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_present() {
        let payload = serde_json::json!({"access_token": "tok", "expires_in": 1800});
        assert_eq!(access_token(&payload).unwrap(), "tok");
    }

    #[test]
    fn access_token_missing_is_credentials_not_found() {
        let payload = serde_json::json!({"token_type": "bearer"});
        assert!(matches!(
            access_token(&payload),
            Err(Error::CredentialsNotFound)
        ));
    }
}
