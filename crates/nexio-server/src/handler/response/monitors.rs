//! Response types for the monitoring handlers.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::Serialize;

/// Liveness probe response.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct HealthResponse {
    /// Whether the service and its store connection are healthy.
    pub is_healthy: bool,
    /// When the health status was computed.
    pub updated_at: Timestamp,
}
