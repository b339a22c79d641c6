//! Request extractors.
//!
//! - [`AuthState`]: the caller's owner id, verified from Basic credentials
//! - [`Path`], [`Query`], [`RawBody`]: `axum` extractors whose rejections use
//!   the error envelope

pub mod auth;
pub mod reject;

pub use crate::extract::auth::AuthState;
pub use crate::extract::reject::{Path, Query, RawBody};
