//! Path parameter types shared by the handlers.

use nexio_core::Platform;
use schemars::JsonSchema;
use serde::Deserialize;

/// Path parameters for platform-scoped routes.
#[must_use]
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct PlatformPathParams {
    /// The platform this request targets.
    pub platform: Platform,
}
