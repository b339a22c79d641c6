//! Monitor response types.

use serde::Serialize;

/// Health check body.
#[must_use]
#[derive(Debug, Serialize)]
pub struct MonitorStatus {
    /// Application version.
    pub version: &'static str,
    /// Service name.
    pub service: &'static str,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            service: env!("CARGO_PKG_NAME"),
        }
    }
}
