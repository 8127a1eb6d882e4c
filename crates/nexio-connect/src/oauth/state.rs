//! CSRF state blobs binding an OAuth flow to its initiating user/org.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use nexio_core::Platform;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of random bytes behind each CSRF token.
const CSRF_TOKEN_BYTES: usize = 32;

/// State blob carried through the authorization redirect.
///
/// Generated by the authorizer, stored for one round-trip, and
/// validated against the value the platform echoes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub csrf_token: String,
    pub user_id: String,
    pub org_id: String,
}

impl AuthState {
    /// Creates a state blob with a fresh CSRF token.
    #[must_use]
    pub fn generate(user_id: impl Into<String>, org_id: impl Into<String>) -> Self {
        let mut bytes = [0u8; CSRF_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        Self {
            csrf_token: URL_SAFE_NO_PAD.encode(bytes),
            user_id: user_id.into(),
            org_id: org_id.into(),
        }
    }

    /// Encodes the blob for embedding in the `state` query parameter.
    ///
    /// HubSpot and Airtable get URL-safe base64 over JSON; Notion gets
    /// the plain JSON string (percent-encoded by the URL builder).
    pub fn encode(&self, platform: Platform) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(match platform {
            Platform::HubSpot | Platform::Airtable => URL_SAFE_NO_PAD.encode(json),
            Platform::Notion => json,
        })
    }

    /// Decodes a returned `state` parameter.
    ///
    /// Any decoding failure or missing identifier is a state mismatch;
    /// the callback never proceeds to token exchange from here.
    pub fn decode(platform: Platform, encoded: &str) -> Result<Self> {
        let json = match platform {
            Platform::HubSpot | Platform::Airtable => {
                let bytes = URL_SAFE_NO_PAD
                    .decode(encoded)
                    .map_err(|e| Error::state_mismatch(format!("invalid base64: {e}")))?;
                String::from_utf8(bytes)
                    .map_err(|e| Error::state_mismatch(format!("invalid utf-8: {e}")))?
            }
            Platform::Notion => encoded.to_string(),
        };

        let state: Self = serde_json::from_str(&json)
            .map_err(|e| Error::state_mismatch(format!("invalid state payload: {e}")))?;

        if state.user_id.is_empty() || state.org_id.is_empty() {
            return Err(Error::state_mismatch("missing user or org identifier"));
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_distinct_tokens() {
        let a = AuthState::generate("u1", "o1");
        let b = AuthState::generate("u1", "o1");
        assert_ne!(a.csrf_token, b.csrf_token);
        assert_eq!(a.user_id, "u1");
        assert_eq!(a.org_id, "o1");
    }

    #[test]
    fn base64_roundtrip_for_hubspot() {
        let state = AuthState::generate("u1", "o1");
        let encoded = state.encode(Platform::HubSpot).unwrap();
        // Encoded form is opaque, not raw JSON.
        assert!(!encoded.contains('{'));
        let decoded = AuthState::decode(Platform::HubSpot, &encoded).unwrap();
        assert_eq!(state, decoded);
    }

    #[test]
    fn plain_json_roundtrip_for_notion() {
        let state = AuthState::generate("u2", "o2");
        let encoded = state.encode(Platform::Notion).unwrap();
        assert!(encoded.contains("\"user_id\""));
        let decoded = AuthState::decode(Platform::Notion, &encoded).unwrap();
        assert_eq!(state, decoded);
    }

    #[test]
    fn decode_garbage_is_state_mismatch() {
        assert!(matches!(
            AuthState::decode(Platform::HubSpot, "%%%not-base64%%%"),
            Err(Error::StateMismatch { .. })
        ));
        assert!(matches!(
            AuthState::decode(Platform::Notion, "not json"),
            Err(Error::StateMismatch { .. })
        ));
    }

    #[test]
    fn decode_rejects_missing_identifiers() {
        let json = r#"{"csrf_token":"t","user_id":"","org_id":"o1"}"#;
        assert!(matches!(
            AuthState::decode(Platform::Notion, json),
            Err(Error::StateMismatch { .. })
        ));
    }
}
