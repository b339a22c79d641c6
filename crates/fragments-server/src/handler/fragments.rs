//! Fragment handlers: create, list, read, convert, update and delete.
//!
//! Every route here requires Basic credentials; the authenticated caller
//! only ever sees their own fragments.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{self, HeaderMap};
use axum::response::IntoResponse;
use axum::routing::get;
use fragments_core::FragmentService;
use fragments_core::fragment::FragmentId;
use serde::Deserialize;

use crate::extract::{AuthState, Path, Query, RawBody};
use crate::handler::response::{FragmentBody, FragmentInfo, FragmentsBody, Success};
use crate::handler::{ErrorKind, Result};
use crate::service::{ApiUrl, ServiceState};

/// Tracing target for fragment operations.
const TRACING_TARGET: &str = "fragments_server::handler::fragments";

/// `Query` params for the fragment listing.
#[must_use]
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// `1` returns full metadata records instead of ids.
    pub expand: Option<String>,
}

impl ListParams {
    fn is_expanded(&self) -> bool {
        self.expand.as_deref() == Some("1")
    }
}

/// Splits `{id}.{ext}` into the id and optional conversion extension.
///
/// The id is the part before the first dot, the extension the part after
/// the last one.
fn split_id(value: &str) -> (FragmentId, Option<&str>) {
    let mut parts = value.split('.');
    let id = parts.next().unwrap_or_default();
    let extension = parts.next_back();
    (FragmentId::new(id), extension)
}

/// Returns the request's `Content-Type` header.
fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

/// Creates a new fragment from the request body.
#[tracing::instrument(skip_all, fields(owner_id = %auth_state.owner_id()))]
async fn create_fragment(
    State(fragments): State<FragmentService>,
    State(api_url): State<ApiUrl>,
    auth_state: AuthState,
    headers: HeaderMap,
    RawBody(data): RawBody,
) -> Result<impl IntoResponse> {
    let Some(content_type) = content_type(&headers) else {
        tracing::warn!(target: TRACING_TARGET, "Fragment without Content-Type rejected");
        return Err(ErrorKind::UnsupportedMediaType
            .with_message("Unsupported Content-Type")
            .with_context("missing Content-Type header"));
    };

    let fragment = fragments
        .create(auth_state.into_owner_id(), content_type, data)
        .await?;

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());
    let location = api_url.fragment_location(host, fragment.id());

    tracing::info!(
        target: TRACING_TARGET,
        fragment_id = %fragment.id(),
        content_type = %fragment.content_type(),
        size = fragment.size(),
        "Fragment created"
    );

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Success::new(FragmentBody {
            fragment: FragmentInfo::created(fragment),
        }),
    ))
}

/// Lists the caller's fragments.
#[tracing::instrument(skip_all, fields(owner_id = %auth_state.owner_id()))]
async fn list_fragments(
    State(fragments): State<FragmentService>,
    auth_state: AuthState,
    Query(params): Query<ListParams>,
) -> Result<Success<FragmentsBody>> {
    let list = fragments
        .list(auth_state.owner_id(), params.is_expanded())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = list.len(),
        expand = params.is_expanded(),
        "Fragments listed"
    );

    Ok(Success::new(FragmentsBody { fragments: list }))
}

/// Returns a fragment's data, converted when the id carries an extension.
#[tracing::instrument(skip_all, fields(owner_id = %auth_state.owner_id()))]
async fn read_fragment(
    State(fragments): State<FragmentService>,
    auth_state: AuthState,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let (id, extension) = split_id(&id);
    let data = fragments
        .read(auth_state.owner_id(), &id, extension)
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        fragment_id = %id,
        extension = extension.unwrap_or_default(),
        content_type = %data.content_type,
        size = data.data.len(),
        "Fragment data read"
    );

    Ok(([(header::CONTENT_TYPE, data.content_type)], data.data))
}

/// Returns a fragment's metadata and the types it can be read as.
#[tracing::instrument(skip_all, fields(owner_id = %auth_state.owner_id()))]
async fn read_fragment_info(
    State(fragments): State<FragmentService>,
    auth_state: AuthState,
    Path(id): Path<FragmentId>,
) -> Result<Success<FragmentBody>> {
    let fragment = fragments.info(auth_state.owner_id(), &id).await?;

    Ok(Success::new(FragmentBody {
        fragment: FragmentInfo::with_formats(fragment),
    }))
}

/// Replaces a fragment's data; its type can not change.
#[tracing::instrument(skip_all, fields(owner_id = %auth_state.owner_id()))]
async fn update_fragment(
    State(fragments): State<FragmentService>,
    auth_state: AuthState,
    Path(id): Path<FragmentId>,
    headers: HeaderMap,
    RawBody(data): RawBody,
) -> Result<Success<FragmentBody>> {
    let declared = content_type(&headers).unwrap_or_default();
    let fragment = fragments
        .update(auth_state.owner_id(), &id, data, declared)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        fragment_id = %id,
        size = fragment.size(),
        "Fragment updated"
    );

    Ok(Success::new(FragmentBody {
        fragment: FragmentInfo::with_formats(fragment),
    }))
}

/// Deletes a fragment's metadata and data.
#[tracing::instrument(skip_all, fields(owner_id = %auth_state.owner_id()))]
async fn delete_fragment(
    State(fragments): State<FragmentService>,
    auth_state: AuthState,
    Path(id): Path<FragmentId>,
) -> Result<impl IntoResponse> {
    fragments.delete(auth_state.owner_id(), &id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        fragment_id = %id,
        "Fragment deleted"
    );

    Ok(Success::empty())
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/v1/fragments", get(list_fragments).post(create_fragment))
        .route(
            "/v1/fragments/{id}",
            get(read_fragment)
                .put(update_fragment)
                .delete(delete_fragment),
        )
        .route("/v1/fragments/{id}/info", get(read_fragment_info))
}
