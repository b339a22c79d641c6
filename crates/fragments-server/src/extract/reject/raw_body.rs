use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use bytes::Bytes;
use derive_more::{Deref, From};

use crate::handler::{Error, ErrorKind};

/// Complete request body as raw bytes.
///
/// Bodies over the configured limit are rejected with 413.
#[must_use]
#[derive(Debug, Clone, Default, Deref, From)]
pub struct RawBody(pub Bytes);

impl RawBody {
    /// Returns the body bytes.
    #[inline]
    pub fn into_inner(self) -> Bytes {
        self.0
    }
}

impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(req, state)
            .await
            .map(Self)
            .map_err(Into::into)
    }
}

impl From<BytesRejection> for Error<'static> {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ErrorKind::PayloadTooLarge.with_context(rejection.body_text())
        } else {
            ErrorKind::BadRequest
                .with_message("invalid body content")
                .with_context(rejection.body_text())
        }
    }
}
