//! Media types and content-type parsing.
//!
//! [`MediaType`] is the closed set of base types a fragment may be created
//! with. [`ContentType`] is a parsed `Content-Type` value that keeps its
//! parameters (e.g. `charset`) while exposing the base type for matching.

mod content_type;
mod media_type;

pub use content_type::ContentType;
pub use media_type::{MediaType, OCTET_STREAM};
