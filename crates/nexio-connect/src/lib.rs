#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for OAuth flow operations.
pub const TRACING_TARGET_OAUTH: &str = "nexio_connect::oauth";

/// Tracing target for paginated item fetches.
pub const TRACING_TARGET_FETCH: &str = "nexio_connect::fetch";

/// Tracing target for cross-platform transfers.
pub const TRACING_TARGET_TRANSFER: &str = "nexio_connect::transfer";

mod connector;
mod error;
pub mod oauth;
pub mod platforms;
pub mod transfer;

pub use connector::{HttpConfig, HttpConnector};
pub use error::{Error, Result};
pub use oauth::{AuthState, AuthorizeUrl, OAuthFlow};
