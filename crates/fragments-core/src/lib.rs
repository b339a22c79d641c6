#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for fragment entity and repository operations.
pub const TRACING_TARGET_FRAGMENT: &str = "fragments_core::fragment";

/// Tracing target for storage backend operations.
pub const TRACING_TARGET_STORAGE: &str = "fragments_core::storage";

/// Tracing target for content conversion.
pub const TRACING_TARGET_CONVERT: &str = "fragments_core::convert";

/// Tracing target for service-level operations.
pub const TRACING_TARGET_SERVICE: &str = "fragments_core::service";

mod error;
mod registry;
mod service;

pub mod convert;
pub mod fragment;
pub mod media;
pub mod storage;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use registry::TypeRegistry;
pub use service::{FragmentData, FragmentService};
