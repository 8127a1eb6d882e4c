//! HTTP server startup with lifecycle management.
//!
//! Provides a small API for starting the HTTP server with graceful
//! shutdown and structured error reporting.

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "nexio_cli::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "nexio_cli::server::shutdown";

mod error;
mod http_server;
mod shutdown;

pub use error::{Result, ServerError};
pub use http_server::serve_http;
use shutdown::shutdown_signal;
