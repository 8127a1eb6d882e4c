//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig    # Host, port, shutdown
//! ├── service: ServiceConfig  # Public URL, OAuth client credentials, transfer targets
//! └── nats: NatsConfig        # NATS connection
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod server;

use clap::Parser;
use nexio_nats::NatsConfig;
use nexio_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};

pub use server::{ServerConfig, log_server_config};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the nexio server:
/// - [`ServerConfig`]: Network binding and lifecycle
/// - [`ServiceConfig`]: Integration provider credentials and transfer targets
/// - [`NatsConfig`]: NATS connection for flow-state storage
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "nexio")]
#[command(about = "Nexio unified SaaS integration server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Integration service configuration (providers, transfer targets).
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// NATS connection configuration.
    #[clap(flatten)]
    pub nats: NatsConfig,
}
