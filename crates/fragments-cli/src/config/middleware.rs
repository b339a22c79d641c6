//! Middleware configuration for the HTTP server.
//!
//! ```bash
//! fragments --cors-origins "https://example.com" --request-timeout 60
//! ```

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use fragments_server::middleware::{RecoveryConfig, SecurityConfig};
use serde::{Deserialize, Serialize};

use super::TRACING_TARGET_CONFIG;

/// Middleware configuration combining security and recovery settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS and request body limit.
    #[clap(flatten)]
    pub security: SecurityConfig,

    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates limits and timeouts.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.recovery.request_timeout == 0 || self.recovery.request_timeout > 300 {
            return Err(anyhow!(
                "Request timeout {} seconds is invalid. Must be between 1 and 300 seconds.",
                self.recovery.request_timeout
            ));
        }

        if self.security.max_body_size == 0 {
            return Err(anyhow!("Maximum body size must be greater than zero."));
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.security.cors_origins,
            max_age_secs = self.security.cors_max_age,
            max_body_size = self.security.max_body_size,
            "Security configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );
    }
}
