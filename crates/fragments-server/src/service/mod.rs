//! Application state and dependency injection.

mod auth;
mod config;
mod error;

use std::sync::Arc;

use fragments_core::FragmentService;
use fragments_core::fragment::FragmentId;

pub use crate::service::auth::{Authenticator, owner_id_for};
pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder, StorageBackend};
pub use crate::service::error::{Result, ServiceError};
use crate::TRACING_TARGET_SERVICE;

#[cfg(test)]
pub(crate) use crate::service::auth::hash_password;

/// Base URL used in `Location` headers of created fragments.
///
/// Falls back to `http://{Host}` when not configured.
#[derive(Debug, Clone, Default)]
pub struct ApiUrl(Option<Arc<str>>);

impl ApiUrl {
    /// Creates a base URL; trailing slashes are ignored.
    pub fn new(url: impl AsRef<str>) -> Self {
        Self(Some(Arc::from(url.as_ref().trim_end_matches('/'))))
    }

    /// Returns the location of a fragment.
    pub fn fragment_location(&self, host: Option<&str>, id: &FragmentId) -> String {
        match (&self.0, host) {
            (Some(base), _) => format!("{base}/v1/fragments/{id}"),
            (None, Some(host)) => format!("http://{host}/v1/fragments/{id}"),
            (None, None) => format!("/v1/fragments/{id}"),
        }
    }
}

impl From<Option<String>> for ApiUrl {
    fn from(url: Option<String>) -> Self {
        url.map(Self::new).unwrap_or_default()
    }
}

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    fragments: FragmentService,
    authenticator: Authenticator,
    api_url: ApiUrl,
}

impl ServiceState {
    /// Creates the state from already constructed services.
    pub fn new(fragments: FragmentService, authenticator: Authenticator) -> Self {
        Self {
            fragments,
            authenticator,
            api_url: ApiUrl::default(),
        }
    }

    /// Initializes application state from configuration.
    ///
    /// Builds the type registry, connects the storage backend and loads
    /// the credentials file.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let registry = Arc::new(config.type_registry()?);
        let store = config.connect_storage().await?;
        let authenticator = config.load_authenticator().await?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            backend = ?config.storage_backend,
            supported_types = registry.supported_types().count(),
            users = authenticator.len(),
            "Service state initialized"
        );

        Ok(Self::new(
            FragmentService::new(store, registry),
            authenticator,
        ))
    }

    /// Sets the base URL used in `Location` headers.
    pub fn with_api_url(self, api_url: impl Into<ApiUrl>) -> Self {
        Self {
            api_url: api_url.into(),
            ..self
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(fragments: FragmentService);
impl_di!(authenticator: Authenticator);
impl_di!(api_url: ApiUrl);
