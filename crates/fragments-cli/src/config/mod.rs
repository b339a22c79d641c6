//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, API URL, shutdown, logging
//! ├── middleware: MiddlewareConfig # CORS, body limit, request timeout
//! └── service: ServiceConfig       # Storage backend, credentials, types
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use fragments_server::service::{ServiceConfig, StorageBackend};
pub use middleware::MiddlewareConfig;
use serde::{Deserialize, Serialize};
pub use server::{LogFormat, ServerConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "fragments")]
#[command(about = "Fragments content store server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, body limit, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Storage, credentials and accepted content types.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its values
    /// act as defaults for the `env` attributes.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// `RUST_LOG` selects the filter, `info` when unset.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self.server.log_format {
            LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
                .init(),
        }
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.service
            .type_registry()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs configuration at info level (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            "Starting fragments server"
        );

        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        match self.service.storage_backend {
            StorageBackend::Memory => tracing::info!(
                target: TRACING_TARGET_CONFIG,
                backend = "memory",
                credentials_file = %self.service.credentials_file.display(),
                supported_types = ?self.service.supported_types,
                "Service configuration"
            ),
            StorageBackend::Nats => tracing::info!(
                target: TRACING_TARGET_CONFIG,
                backend = "nats",
                nats_url = %self.service.nats.nats_url,
                credentials_file = %self.service.credentials_file.display(),
                supported_types = ?self.service.supported_types,
                "Service configuration"
            ),
        }
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "dotenv").then_some("dotenv"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["fragments"])?;
        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.service.storage_backend, StorageBackend::Memory);
        assert!(cli.validate().is_ok());
        Ok(())
    }

    #[test]
    fn parses_flags() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "fragments",
            "--port",
            "9000",
            "--storage-backend",
            "nats",
            "--supported-types",
            "text/plain,text/markdown",
            "--log-format",
            "json",
        ])?;
        assert_eq!(cli.server.port, 9000);
        assert_eq!(cli.server.log_format, LogFormat::Json);
        assert_eq!(cli.service.storage_backend, StorageBackend::Nats);
        assert_eq!(cli.service.supported_types.len(), 2);
        Ok(())
    }

    #[test]
    fn rejects_unknown_types() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["fragments", "--supported-types", "application/x-nope"])?;
        assert!(cli.validate().is_err());
        Ok(())
    }
}
