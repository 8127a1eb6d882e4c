//! Error types for HTTP handlers and conversions from lower layers.

mod connect_error;
mod http_error;
mod nats_error;

pub use http_error::{Error, ErrorKind, Result};
