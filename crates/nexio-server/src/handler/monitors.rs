//! System health monitoring handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use nexio_nats::NatsClient;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::HealthResponse;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "nexio_server::handler::monitors";

/// Liveness probe.
///
/// Reports unhealthy (503) when the store connection is down.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(nats): State<NatsClient>,
) -> Result<(StatusCode, Json<HealthResponse>)> {
    let is_healthy = nats.is_connected();

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        is_healthy = is_healthy,
        status_code = status_code.as_u16(),
        "Health status checked"
    );

    Ok((
        status_code,
        Json(HealthResponse {
            is_healthy,
            updated_at: jiff::Timestamp::now(),
        }),
    ))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health check")
        .description("Returns the service liveness status.")
        .response::<200, Json<HealthResponse>>()
        .response::<503, Json<HealthResponse>>()
}

/// Returns routes for health monitoring.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}
