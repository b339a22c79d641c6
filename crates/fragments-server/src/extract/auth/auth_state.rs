//! Authenticated caller extracted from HTTP Basic credentials.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Basic;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use derive_more::Deref;
use fragments_core::fragment::OwnerId;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind};
use crate::service::Authenticator;

/// Owner id of the authenticated caller.
///
/// Extraction verifies the `Authorization: Basic` header against the
/// [`Authenticator`]; the result is cached in the request extensions so
/// later extractors in the same request skip the password check.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct AuthState(pub OwnerId);

impl AuthState {
    /// Returns the caller's owner id.
    #[inline]
    pub fn owner_id(&self) -> &OwnerId {
        &self.0
    }

    /// Consumes the state and returns the owner id.
    #[inline]
    pub fn into_owner_id(self) -> OwnerId {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
    Authenticator: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        type AuthBasicHeader = TypedHeader<Authorization<Basic>>;
        let header = match AuthBasicHeader::from_request_parts(parts, state).await {
            Ok(header) => header,
            Err(rejection) => {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    reason = %rejection,
                    "Rejected request without valid Basic credentials"
                );
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_context("missing Authorization header"),
                    _ => ErrorKind::Unauthorized
                        .with_context("Authorization header must contain Basic credentials"),
                };
                return Err(error.with_resource("authentication"));
            }
        };

        let authenticator = Authenticator::from_ref(state);
        let owner_id = authenticator.verify(header.username(), header.password())?;

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            owner_id = %owner_id,
            "Authenticated request"
        );

        let auth_state = Self(owner_id);
        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}
