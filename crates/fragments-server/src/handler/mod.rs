//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use fragments_server::handler::routes;
//! use fragments_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config).await?;
//! let app: axum::Router = routes(state.clone()).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod fragments;
mod monitors;
mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::fragments::ListParams;
pub use crate::handler::response::{
    Empty, ErrorResponse, FragmentBody, FragmentInfo, FragmentsBody, MonitorStatus, Success,
};
use crate::middleware::RouterAuthExt;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all private routes.
fn private_routes(state: ServiceState) -> Router<ServiceState> {
    fragments::routes().with_authentication(state)
}

/// Returns a [`Router`] with all public routes.
fn public_routes() -> Router<ServiceState> {
    monitors::routes()
}

/// Returns a [`Router`] with all routes.
///
/// Unknown paths fall back to an enveloped `404`.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(private_routes(state))
        .merge(public_routes())
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use axum::Router;
    use axum_test::TestServer;
    use fragments_core::storage::MemoryStore;
    use fragments_core::{FragmentService, TypeRegistry};

    use crate::handler::routes;
    use crate::service::{Authenticator, ServiceState, hash_password};

    /// `Authorization` value for `user1@email.com:password1`.
    pub const USER1: &str = "Basic dXNlcjFAZW1haWwuY29tOnBhc3N3b3JkMQ==";

    /// `Authorization` value for `user2@email.com:password2`.
    pub const USER2: &str = "Basic dXNlcjJAZW1haWwuY29tOnBhc3N3b3JkMg==";

    /// Returns state over an in-memory store with two known users.
    pub fn create_test_state() -> anyhow::Result<ServiceState> {
        let fragments = FragmentService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(TypeRegistry::default()),
        );
        let authenticator = Authenticator::new([
            ("user1@email.com".to_owned(), hash_password("password1")),
            ("user2@email.com".to_owned(), hash_password("password2")),
        ])?;
        Ok(ServiceState::new(fragments, authenticator))
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub async fn create_test_server_with_state(
        router: Router<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let app = router.with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        let state = create_test_state()?;
        let router = routes(state.clone());
        create_test_server_with_state(router, state).await
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn fallback_uses_error_envelope() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/v2/unknown").await;
        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"]["code"], 404);
        Ok(())
    }
}
