#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for NATS client operations.
///
/// Use this target for logging client initialization, configuration, and client-level errors.
pub const TRACING_TARGET_CLIENT: &str = "fragments_nats::client";

/// Tracing target for NATS connection operations.
pub const TRACING_TARGET_CONNECTION: &str = "fragments_nats::connection";

/// Tracing target for metadata key-value bucket operations.
pub const TRACING_TARGET_KV: &str = "fragments_nats::kv";

/// Tracing target for data object store operations.
pub const TRACING_TARGET_OBJECT: &str = "fragments_nats::object";

mod client;
mod error;
mod store;

pub mod kv;
pub mod object;

pub use async_nats::jetstream;
pub use client::{NatsClient, NatsConfig};
pub use error::{Error, Result};
pub use store::NatsFragmentStore;
