//! Shutdown signal handling.

use std::time::Duration;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;

use super::TRACING_TARGET_SHUTDOWN;

/// Resolves once a termination signal arrives (SIGTERM or Ctrl+C).
///
/// The returned future is handed to axum's graceful-shutdown hook; the
/// server then stops accepting connections and drains in-flight
/// requests for up to `shutdown_timeout`.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                "Ctrl+C received, draining in-flight requests"
            ),
            Err(e) => tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %e,
                "Could not register Ctrl+C handler"
            ),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!(
                    target: TRACING_TARGET_SHUTDOWN,
                    "SIGTERM received, draining in-flight requests"
                );
            }
            Err(e) => tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %e,
                "Could not register SIGTERM handler"
            ),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        drain_timeout_secs = shutdown_timeout.as_secs(),
        "Stopping integration server"
    );
}
