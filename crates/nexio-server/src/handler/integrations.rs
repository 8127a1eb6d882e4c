//! Integration pipeline handlers.
//!
//! One route family per pipeline phase: starting an OAuth2 flow,
//! handling the provider callback, handing out cached credentials,
//! loading normalized items, and transferring them to a destination.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use nexio_connect::oauth::{self, AuthState};
use nexio_connect::platforms::fetch_platform_items;
use nexio_connect::transfer::transfer_items;
use nexio_connect::{Error as ConnectError, HttpConnector};
use nexio_core::IntegrationItem;
use nexio_nats::NatsClient;
use nexio_nats::kv::FlowKey;

use crate::extract::{Json, Path, Query};
use crate::handler::request::{
    AuthorizeRequest, CallbackParams, CredentialsRequest, LoadRequest, PlatformPathParams,
    TransferRequest,
};
use crate::handler::response::{AuthorizeResponse, ErrorResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{Integrations, ServiceState};

/// Tracing target for integration pipeline operations.
const TRACING_TARGET: &str = "nexio_server::handler::integrations";

/// Page returned to the popup window after a successful callback.
const CALLBACK_COMPLETE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Authorization complete</title></head>
  <body>
    <p>Authorization complete. You can close this window.</p>
    <script>window.close();</script>
  </body>
</html>"#;

/// Starts an OAuth2 authorization flow.
///
/// Generates a CSRF state blob, stores it for callback verification,
/// and returns the platform's authorization URL.
#[tracing::instrument(
    skip_all,
    fields(
        platform = %path_params.platform,
        user_id = %request.user_id,
        org_id = %request.org_id,
    )
)]
async fn authorize_integration(
    State(nats): State<NatsClient>,
    State(connector): State<HttpConnector>,
    State(integrations): State<Integrations>,
    Path(path_params): Path<PlatformPathParams>,
    Json(request): Json<AuthorizeRequest>,
) -> Result<(StatusCode, Json<AuthorizeResponse>)> {
    tracing::debug!(target: TRACING_TARGET, "Starting authorization flow");

    let flow = integrations.flow(path_params.platform, &connector);
    let authorize = flow.begin(&request.user_id, &request.org_id)?;

    let key = FlowKey::new(path_params.platform, &request.org_id, &request.user_id);
    let store = nats.auth_state_store().await?;
    store.put(&key, &authorize.encoded_state).await?;

    tracing::info!(target: TRACING_TARGET, "Authorization flow started");

    Ok((
        StatusCode::OK,
        Json(AuthorizeResponse { url: authorize.url }),
    ))
}

fn authorize_integration_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Start authorization")
        .description("Starts an OAuth2 flow and returns the platform's authorization URL.")
        .response::<200, Json<AuthorizeResponse>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Handles the OAuth2 redirect from the platform.
///
/// Validates the echoed state against the stored blob (single use),
/// exchanges the authorization code, and caches the raw token payload.
#[tracing::instrument(skip_all, fields(platform = %path_params.platform))]
async fn oauth2_callback(
    State(nats): State<NatsClient>,
    State(connector): State<HttpConnector>,
    State(integrations): State<Integrations>,
    Path(path_params): Path<PlatformPathParams>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<&'static str>> {
    tracing::debug!(target: TRACING_TARGET, "Handling OAuth callback");

    if let Some(error) = params.error {
        return Err(ConnectError::authorization_denied(error).into());
    }

    let Some(encoded_state) = params.state else {
        return Err(ConnectError::state_mismatch("missing state parameter").into());
    };
    let state = AuthState::decode(path_params.platform, &encoded_state)?;

    let Some(code) = params.code else {
        return Err(ConnectError::state_mismatch("missing authorization code").into());
    };

    let key = FlowKey::new(path_params.platform, &state.org_id, &state.user_id);
    let store = nats.auth_state_store().await?;
    verify_stored_state(store.take(&key).await?, &encoded_state)?;

    let flow = integrations.flow(path_params.platform, &connector);
    let payload = flow.exchange_code(&code).await?;

    let credentials = nats.credentials_store().await?;
    credentials.put(&key, &payload).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %state.user_id,
        org_id = %state.org_id,
        "OAuth flow completed, credentials cached"
    );

    Ok(Html(CALLBACK_COMPLETE_HTML))
}

fn oauth2_callback_docs(op: TransformOperation) -> TransformOperation {
    op.summary("OAuth2 callback")
        .description(
            "Redirect target for the platform's authorization server. \
             Returns a window-closing HTML page on success.",
        )
        .response::<400, Json<ErrorResponse>>()
}

/// Returns the cached token payload for a user/org pair.
///
/// The payload is deleted on read: each successful retrieval requires a
/// prior authorization flow.
#[tracing::instrument(
    skip_all,
    fields(
        platform = %path_params.platform,
        user_id = %request.user_id,
        org_id = %request.org_id,
    )
)]
async fn get_credentials(
    State(nats): State<NatsClient>,
    Path(path_params): Path<PlatformPathParams>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    tracing::debug!(target: TRACING_TARGET, "Retrieving cached credentials");

    let key = FlowKey::new(path_params.platform, &request.org_id, &request.user_id);
    let store = nats.credentials_store().await?;
    let payload = require_credentials(store.take(&key).await?)?;

    tracing::info!(target: TRACING_TARGET, "Credentials retrieved (single-use)");

    Ok((StatusCode::OK, Json(payload)))
}

fn get_credentials_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get credentials")
        .description("Returns the cached raw token payload. Single-use: deleted on read.")
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Fetches and normalizes all listable items from the platform.
///
/// The full normalized list is cached for later transfer and returned.
#[tracing::instrument(
    skip_all,
    fields(
        platform = %path_params.platform,
        user_id = %request.user_id,
        org_id = %request.org_id,
    )
)]
async fn load_items(
    State(nats): State<NatsClient>,
    State(connector): State<HttpConnector>,
    Path(path_params): Path<PlatformPathParams>,
    Json(request): Json<LoadRequest>,
) -> Result<(StatusCode, Json<Vec<IntegrationItem>>)> {
    tracing::debug!(target: TRACING_TARGET, "Loading platform items");

    let access_token = oauth::access_token(&request.credentials)?;
    let items = fetch_platform_items(&connector, path_params.platform, access_token).await?;

    let key = FlowKey::new(path_params.platform, &request.org_id, &request.user_id);
    let store = nats.items_store().await?;
    store.put(&key, &items).await?;

    tracing::info!(
        target: TRACING_TARGET,
        item_count = items.len(),
        "Items loaded and cached"
    );

    Ok((StatusCode::OK, Json(items)))
}

fn load_items_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Load items")
        .description("Fetches all listable items from the platform and returns them normalized.")
        .response::<200, Json<Vec<IntegrationItem>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Transfers the cached item list to a destination platform.
#[tracing::instrument(
    skip_all,
    fields(
        platform = %path_params.platform,
        destination = %request.destination,
        user_id = %request.user_id,
        org_id = %request.org_id,
    )
)]
async fn transfer_integration_items(
    State(nats): State<NatsClient>,
    State(connector): State<HttpConnector>,
    State(integrations): State<Integrations>,
    Path(path_params): Path<PlatformPathParams>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    tracing::debug!(target: TRACING_TARGET, "Transferring cached items");

    if !request.destination.supports_transfer_destination() {
        return Err(ErrorKind::BadRequest
            .with_message("Unsupported transfer destination")
            .with_resource(request.destination.as_str()));
    }
    if request.destination == path_params.platform {
        return Err(ErrorKind::BadRequest
            .with_message("Cannot transfer items to their source platform"));
    }

    let key = FlowKey::new(path_params.platform, &request.org_id, &request.user_id);
    let store = nats.items_store().await?;
    let items = require_cached_items(store.get_value(&key).await)?;

    let access_token = oauth::access_token(&request.destination_credentials)?;
    let response = transfer_items(
        &connector,
        request.destination,
        integrations.transfer_targets(),
        access_token,
        &items,
    )
    .await?;

    tracing::info!(
        target: TRACING_TARGET,
        item_count = items.len(),
        "Items transferred"
    );

    Ok((StatusCode::OK, Json(response)))
}

fn transfer_integration_items_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Transfer items")
        .description(
            "Writes the cached item list into a destination platform and \
             returns the destination's final raw response.",
        )
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Compares the state blob echoed by the platform against the stored
/// one. The caller consumes the stored blob before comparing, so a
/// replayed callback finds nothing even when it carries a previously
/// valid state.
fn verify_stored_state(
    stored_state: Option<String>,
    encoded_state: &str,
) -> Result<(), ConnectError> {
    let Some(stored_state) = stored_state else {
        return Err(ConnectError::StateExpiredOrInvalid);
    };
    if stored_state != encoded_state {
        return Err(ConnectError::state_mismatch(
            "returned state does not match stored state",
        ));
    }
    Ok(())
}

/// Unwraps a credentials take. A miss means the payload was never
/// cached, expired, or was already consumed by an earlier request.
fn require_credentials(payload: Option<serde_json::Value>) -> Result<serde_json::Value> {
    payload.ok_or_else(|| ConnectError::CredentialsNotFound.into())
}

/// Unwraps an item-cache lookup. An entry that no longer deserializes
/// is treated the same as a missing one: both require a fresh load.
fn require_cached_items(
    lookup: nexio_nats::Result<Option<Vec<IntegrationItem>>>,
) -> Result<Vec<IntegrationItem>> {
    match lookup {
        Ok(Some(items)) => Ok(items),
        Ok(None) | Err(nexio_nats::Error::Serialization(_)) => {
            Err(ConnectError::NoCachedData.into())
        }
        Err(error) => Err(error.into()),
    }
}

/// Returns routes for the integration pipeline.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/integrations/{platform}/authorize",
            post_with(authorize_integration, authorize_integration_docs),
        )
        .api_route(
            "/integrations/{platform}/oauth2callback",
            get_with(oauth2_callback, oauth2_callback_docs),
        )
        .api_route(
            "/integrations/{platform}/credentials",
            post_with(get_credentials, get_credentials_docs),
        )
        .api_route(
            "/integrations/{platform}/load",
            post_with(load_items, load_items_docs),
        )
        .api_route(
            "/integrations/{platform}/transfer",
            post_with(transfer_integration_items, transfer_integration_items_docs),
        )
        .with_path_items(|item| item.tag("Integrations"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::http::StatusCode;
    use nexio_core::Platform;

    use super::*;

    /// In-memory stand-in with the same take contract as the KV
    /// buckets: a successful read removes the entry.
    struct SingleUseStore<V>(HashMap<String, V>);

    impl<V> SingleUseStore<V> {
        fn new() -> Self {
            Self(HashMap::new())
        }

        fn put(&mut self, key: &FlowKey, value: V) {
            self.0.insert(key.to_string(), value);
        }

        fn take(&mut self, key: &FlowKey) -> Option<V> {
            self.0.remove(&key.to_string())
        }
    }

    fn flow_key() -> FlowKey {
        FlowKey::new(Platform::HubSpot, "o1", "u1")
    }

    #[test]
    fn state_round_trip_succeeds_exactly_once() {
        let mut store = SingleUseStore::new();
        store.put(&flow_key(), "state-blob".to_string());

        assert!(verify_stored_state(store.take(&flow_key()), "state-blob").is_ok());

        // Replaying the same, previously valid state finds nothing.
        assert!(matches!(
            verify_stored_state(store.take(&flow_key()), "state-blob"),
            Err(ConnectError::StateExpiredOrInvalid)
        ));
    }

    #[test]
    fn tampered_state_is_rejected_and_still_consumed() {
        let mut store = SingleUseStore::new();
        store.put(&flow_key(), "state-blob".to_string());

        assert!(matches!(
            verify_stored_state(store.take(&flow_key()), "another-blob"),
            Err(ConnectError::StateMismatch { .. })
        ));
        // The failed comparison consumed the stored blob as well.
        assert!(store.take(&flow_key()).is_none());
    }

    #[test]
    fn credentials_are_handed_out_once() {
        let mut store = SingleUseStore::new();
        store.put(&flow_key(), serde_json::json!({"access_token": "tok"}));

        let payload = require_credentials(store.take(&flow_key())).unwrap();
        assert_eq!(payload["access_token"], "tok");

        let error = require_credentials(store.take(&flow_key())).unwrap_err();
        assert_eq!(error.kind().status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn absent_and_corrupt_item_caches_are_equivalent() {
        let missing = require_cached_items(Ok(None)).unwrap_err();
        assert_eq!(missing.kind().status_code(), StatusCode::BAD_REQUEST);

        let corrupt = serde_json::from_str::<Vec<IntegrationItem>>("not json").unwrap_err();
        let error = require_cached_items(Err(nexio_nats::Error::Serialization(corrupt))).unwrap_err();
        assert_eq!(error.kind().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.message(),
            Some("No cached data available for transfer")
        );
    }

    #[test]
    fn other_store_failures_stay_internal() {
        let error =
            require_cached_items(Err(nexio_nats::Error::operation("kv_get", "NATS unavailable")))
                .unwrap_err();
        assert_eq!(
            error.kind().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
