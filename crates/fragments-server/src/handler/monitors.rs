//! Health check handler.

use axum::Router;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::handler::response::{MonitorStatus, Success};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "fragments_server::handler::monitors";

/// Reports that the server is up; never cached.
#[tracing::instrument(skip_all)]
async fn health_status() -> impl IntoResponse {
    tracing::trace!(target: TRACING_TARGET, "Health status check requested");

    (
        [(header::CACHE_CONTROL, "no-cache")],
        Success::new(MonitorStatus::default()),
    )
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/", get(health_status))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn health_is_public_and_uncached() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_header("cache-control", "no-cache");

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
