//! HTTP handlers, grouped by route family.

mod error;
mod integrations;
mod monitors;

pub mod request;
pub mod response;

use aide::axum::ApiRouter;

pub use error::{Error, ErrorKind, Result};

use crate::service::ServiceState;

/// Returns all routes of the service.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(integrations::routes())
        .merge(monitors::routes())
}
