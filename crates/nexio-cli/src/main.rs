#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;
use std::sync::Arc;

use aide::openapi::OpenApi;
use anyhow::Context;
use axum::routing::get;
use axum::{Extension, Json, Router};
use clap::Parser;
use nexio_server::handler::routes;
use nexio_server::service::ServiceState;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Cli, log_server_config};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "nexio_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "nexio_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "nexio_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();
    log_startup_info();
    log_server_config(&cli.server);

    cli.server
        .validate()
        .context("invalid server configuration")?;

    let state = ServiceState::from_config(&cli.service, cli.nats)
        .await
        .context("failed to create service state")?;
    let router = create_router(state);

    server::serve_http(router, cli.server).await?;

    Ok(())
}

/// Creates the router with the API documentation and tracing layers applied.
fn create_router(state: ServiceState) -> Router {
    let mut api = OpenApi::default();

    routes()
        .finish_api_with(&mut api, |doc| {
            doc.title("nexio").version(env!("CARGO_PKG_VERSION"))
        })
        .route("/openapi.json", get(serve_openapi))
        .layer(Extension(Arc::new(api)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the generated OpenAPI document.
async fn serve_openapi(Extension(api): Extension<Arc<OpenApi>>) -> Json<Arc<OpenApi>> {
    Json(api)
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting nexio server"
    );

    tracing::debug!(
        target: TRACING_TARGET_SERVER_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        "build information"
    );
}
