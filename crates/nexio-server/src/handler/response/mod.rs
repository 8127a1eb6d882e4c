//! Response types for all handlers.

mod error_response;
mod integrations;
mod monitors;

pub use error_response::ErrorResponse;
pub use integrations::AuthorizeResponse;
pub use monitors::HealthResponse;
