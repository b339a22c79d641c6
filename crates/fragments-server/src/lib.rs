#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for credential verification.
pub const TRACING_TARGET_AUTHENTICATION: &str = "fragments_server::authentication";

/// Tracing target for service state initialization.
pub const TRACING_TARGET_SERVICE: &str = "fragments_server::service";

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;
