//! Response types for HTTP handlers.

mod error_response;
mod fragments;
mod monitors;

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub use error_response::ErrorResponse;
pub use fragments::{FragmentBody, FragmentInfo, FragmentsBody};
pub use monitors::MonitorStatus;

/// Successful JSON response: the body's fields next to `"status": "ok"`.
#[must_use]
#[derive(Debug, Serialize)]
pub struct Success<T> {
    status: &'static str,
    #[serde(flatten)]
    body: T,
}

impl<T> Success<T> {
    /// Wraps a body in the success envelope.
    pub fn new(body: T) -> Self {
        Self { status: "ok", body }
    }
}

impl Success<Empty> {
    /// A success envelope without further fields.
    pub fn empty() -> Self {
        Self::new(Empty {})
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Body without fields.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::to_value(Success::empty())?,
            serde_json::json!({ "status": "ok" })
        );

        let health = serde_json::to_value(Success::new(MonitorStatus::default()))?;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["service"], "fragments-server");
        Ok(())
    }
}
