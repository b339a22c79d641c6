//! Authentication middleware for routes that require credentials.

use axum::Router;
use axum::extract::Request;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::extract::AuthState;
use crate::service::ServiceState;

/// Extension trait for `axum::`[`Router`] to apply authentication middleware.
pub trait RouterAuthExt<S> {
    /// Requires valid Basic credentials for all routes.
    ///
    /// Applied as a route layer, so unmatched paths still reach the fallback.
    fn with_authentication(self, state: ServiceState) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_authentication(self, state: ServiceState) -> Self {
        self.route_layer(from_fn_with_state(state, require_authentication))
    }
}

/// Rejects the request unless it carries valid credentials.
///
/// The verified [`AuthState`] is cached in the request extensions, so
/// handlers extracting it again do not repeat the password check.
pub async fn require_authentication(
    auth_state: AuthState,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(auth_state);
    next.run(request).await
}
