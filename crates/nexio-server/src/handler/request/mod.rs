//! Request types for all handlers.

mod integrations;
mod paths;

pub use integrations::{
    AuthorizeRequest, CallbackParams, CredentialsRequest, LoadRequest, TransferRequest,
};
pub use paths::PlatformPathParams;
