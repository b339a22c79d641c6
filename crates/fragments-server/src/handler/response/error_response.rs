use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::http::header::{HeaderValue, WWW_AUTHENTICATE};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Challenge sent with every 401 response.
const BASIC_CHALLENGE: &str = "Basic realm=\"fragments\", charset=\"UTF-8\"";

/// HTTP error response, serialized inside the error envelope.
///
/// ```json
/// { "status": "error", "error": { "code": 404, "message": "not found" } }
/// ```
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone)]
pub struct ErrorResponse<'a> {
    /// The error name, used in logs and `Display`.
    pub name: Cow<'a, str>,
    /// Message safe for client display.
    pub message: Cow<'a, str>,
    /// The resource that the error relates to.
    pub resource: Option<Cow<'a, str>>,
    /// HTTP status code, serialized as `error.code`.
    pub status: StatusCode,
}

#[derive(Serialize)]
struct Envelope<'r> {
    status: &'static str,
    error: Body<'r>,
}

#[derive(Serialize)]
struct Body<'r> {
    code: u16,
    message: &'r str,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<&'r str>,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new("bad_request", "bad request", StatusCode::BAD_REQUEST);
    pub const MISSING_AUTH_TOKEN: Self = Self::new(
        "missing_auth_token",
        "authentication required",
        StatusCode::UNAUTHORIZED,
    );
    pub const NOT_FOUND: Self = Self::new("not_found", "not found", StatusCode::NOT_FOUND);
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(
        "payload_too_large",
        "request body is too large",
        StatusCode::PAYLOAD_TOO_LARGE,
    );
    pub const UNAUTHORIZED: Self =
        Self::new("unauthorized", "unauthorized", StatusCode::UNAUTHORIZED);
    pub const UNSUPPORTED_MEDIA_TYPE: Self = Self::new(
        "unsupported_media_type",
        "unsupported media type",
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
    );

    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            status,
        }
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the resource.
    /// If a resource already exists, it merges them with a separator.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let new_resource = resource.into();
        self.resource = Some(match self.resource {
            Some(existing) => Cow::Owned(format!("{}/{}", existing, new_resource)),
            None => new_resource,
        });
        self
    }

    fn envelope(&self) -> Envelope<'_> {
        Envelope {
            status: "error",
            error: Body {
                code: self.status.as_u16(),
                message: &self.message,
                resource: self.resource.as_deref(),
            },
        }
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.envelope())).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE));
        }
        response
    }
}
