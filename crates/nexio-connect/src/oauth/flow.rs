//! Authorization URL construction and token exchange.

use nexio_core::{Platform, ProviderConfig};
use url::Url;

use super::AuthState;
use crate::{Error, HttpConnector, Result, TRACING_TARGET_OAUTH};

/// Result of starting an authorization flow.
#[derive(Debug, Clone)]
pub struct AuthorizeUrl {
    /// Full authorization URL to redirect the user to.
    pub url: String,

    /// The generated state blob (for callers that need the CSRF token).
    pub state: AuthState,

    /// The encoded form of `state`, as embedded in the URL; this exact
    /// string is persisted for callback verification.
    pub encoded_state: String,
}

/// One platform's OAuth2 authorization-code flow.
pub struct OAuthFlow {
    connector: HttpConnector,
    config: ProviderConfig,
}

impl OAuthFlow {
    /// Creates a flow for the given provider configuration.
    pub fn new(connector: HttpConnector, config: ProviderConfig) -> Self {
        Self { connector, config }
    }

    /// Returns the platform this flow authorizes against.
    #[inline]
    pub fn platform(&self) -> Platform {
        self.config.platform
    }

    /// Builds the authorization URL with a fresh CSRF state blob.
    ///
    /// The only side effect expected from the caller is persisting
    /// `encoded_state` under the flow's composite key.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_OAUTH)]
    pub fn begin(&self, user_id: &str, org_id: &str) -> Result<AuthorizeUrl> {
        let state = AuthState::generate(user_id, org_id);
        let encoded_state = state.encode(self.config.platform)?;

        let mut url = Url::parse(&self.config.authorize_endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri)
                .append_pair("response_type", "code");

            if !self.config.scopes.is_empty() {
                query.append_pair("scope", &self.config.scopes);
            }

            // Notion additionally requires the grant owner kind.
            if self.config.platform == Platform::Notion {
                query.append_pair("owner", "user");
            }

            query.append_pair("state", &encoded_state);
        }

        tracing::debug!(
            target: TRACING_TARGET_OAUTH,
            platform = %self.config.platform,
            user_id = %user_id,
            org_id = %org_id,
            "Built authorization URL"
        );

        Ok(AuthorizeUrl {
            url: url.into(),
            state,
            encoded_state,
        })
    }

    /// Exchanges an authorization code for the raw token payload.
    ///
    /// Client credentials travel in the form body for HubSpot and as a
    /// Basic auth header for Notion and Airtable; Notion additionally
    /// expects a JSON body.
    #[tracing::instrument(skip(self, code), target = TRACING_TARGET_OAUTH)]
    pub async fn exchange_code(&self, code: &str) -> Result<serde_json::Value> {
        let http = self.connector.http();
        let endpoint = &self.config.token_endpoint;

        let request = match self.config.platform {
            Platform::HubSpot => http.post(endpoint).form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ]),
            Platform::Notion => http
                .post(endpoint)
                .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
                .json(&serde_json::json!({
                    "grant_type": "authorization_code",
                    "code": code,
                    "redirect_uri": self.config.redirect_uri,
                })),
            Platform::Airtable => http
                .post(endpoint)
                .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
                .form(&[
                    ("grant_type", "authorization_code"),
                    ("redirect_uri", self.config.redirect_uri.as_str()),
                    ("code", code),
                ]),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: TRACING_TARGET_OAUTH,
                platform = %self.config.platform,
                status = status.as_u16(),
                "Token exchange failed"
            );
            return Err(Error::TokenExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.json::<serde_json::Value>().await?;

        tracing::info!(
            target: TRACING_TARGET_OAUTH,
            platform = %self.config.platform,
            "Token exchange succeeded"
        );

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn flow_for(platform: Platform, token_endpoint: Option<&str>) -> OAuthFlow {
        let mut config = ProviderConfig::new(
            platform,
            "client-id",
            "client-secret",
            "http://localhost:8000/integrations/callback",
        );
        if let Some(endpoint) = token_endpoint {
            config = config.with_token_endpoint(endpoint);
        }
        OAuthFlow::new(HttpConnector::with_defaults().unwrap(), config)
    }

    #[test]
    fn authorize_url_embeds_decodable_state() {
        let flow = flow_for(Platform::HubSpot, None);
        let authorize = flow.begin("u1", "o1").unwrap();

        let url = Url::parse(&authorize.url).unwrap();
        let state_param = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();

        let decoded = AuthState::decode(Platform::HubSpot, &state_param).unwrap();
        assert_eq!(decoded.user_id, "u1");
        assert_eq!(decoded.org_id, "o1");
        assert_eq!(decoded, authorize.state);
    }

    #[test]
    fn authorize_url_carries_client_parameters() {
        let flow = flow_for(Platform::Notion, None);
        let authorize = flow.begin("u1", "o1").unwrap();

        let url = Url::parse(&authorize.url).unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().collect();
        assert_eq!(pairs["client_id"], "client-id");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["owner"], "user");
        // Notion has no scopes.
        assert!(!pairs.contains_key("scope"));
    }

    #[tokio::test]
    async fn exchange_code_returns_raw_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v1/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "refresh_token": "ref",
                "expires_in": 1800,
            })))
            .mount(&server)
            .await;

        let flow = flow_for(
            Platform::HubSpot,
            Some(&format!("{}/oauth/v1/token", server.uri())),
        );
        let payload = flow.exchange_code("abc").await.unwrap();
        assert_eq!(payload["access_token"], "tok");
    }

    #[tokio::test]
    async fn exchange_code_uses_basic_auth_for_notion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/oauth/token"))
            .and(header_exists("authorization"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "tok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let flow = flow_for(
            Platform::Notion,
            Some(&format!("{}/v1/oauth/token", server.uri())),
        );
        flow.exchange_code("abc").await.unwrap();
    }

    #[tokio::test]
    async fn exchange_failure_captures_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad verification code"))
            .mount(&server)
            .await;

        let flow = flow_for(Platform::Airtable, Some(&format!("{}/token", server.uri())));
        let error = flow.exchange_code("expired").await.unwrap_err();
        match error {
            Error::TokenExchangeFailed { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("bad verification code"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
