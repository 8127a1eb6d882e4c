//! Service configuration, state, and the provider registry.

mod integrations;
mod service_config;
mod service_state;

pub use integrations::Integrations;
pub use service_config::ServiceConfig;
pub use service_state::ServiceState;
