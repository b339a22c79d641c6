use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use derive_builder::Builder;
use fragments_core::TypeRegistry;
use fragments_core::media::MediaType;
use fragments_core::storage::{FragmentStore, MemoryStore};
use fragments_nats::{NatsClient, NatsConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_SERVICE;
use crate::service::{Authenticator, Result, ServiceError};

/// Default values for configuration options.
mod defaults {
    use std::path::PathBuf;

    /// Default path to the credentials file.
    pub fn credentials_file() -> PathBuf {
        "./credentials".into()
    }
}

/// Storage backend holding fragment metadata and data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; contents are lost on restart.
    #[default]
    Memory,
    /// NATS JetStream key-value and object store buckets.
    Nats,
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Storage backend for fragments.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STORAGE_BACKEND", value_enum, default_value = "memory")
    )]
    #[builder(default)]
    pub storage_backend: StorageBackend,

    /// NATS connection, used by the `nats` backend.
    #[cfg_attr(feature = "config", command(flatten))]
    #[builder(default)]
    pub nats: NatsConfig,

    /// File with `email:argon2-hash` lines of users allowed to sign in.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CREDENTIALS_FILE", default_value = "./credentials")
    )]
    #[builder(default = "defaults::credentials_file()")]
    pub credentials_file: PathBuf,

    /// Content types fragments may be created with; all known types if empty.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "SUPPORTED_TYPES", value_delimiter = ',')
    )]
    #[builder(default)]
    pub supported_types: Vec<String>,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Builds the type registry from the configured type list.
    pub fn type_registry(&self) -> Result<TypeRegistry> {
        if self.supported_types.is_empty() {
            return Ok(TypeRegistry::default());
        }

        let types = self
            .supported_types
            .iter()
            .map(|value| {
                value.trim().parse::<MediaType>().map_err(|_| {
                    ServiceError::config(format!("unknown content type '{}'", value.trim()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TypeRegistry::new(types))
    }

    /// Connects the configured storage backend.
    pub async fn connect_storage(&self) -> Result<Arc<dyn FragmentStore>> {
        match self.storage_backend {
            StorageBackend::Memory => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVICE,
                    "Using in-memory storage; fragments are lost on restart"
                );
                Ok(Arc::new(MemoryStore::new()))
            }
            StorageBackend::Nats => {
                let store = self.connect_nats().await?.fragment_store().await.map_err(|e| {
                    ServiceError::external_service_with_source(
                        "NATS",
                        "Failed to open fragment buckets",
                        e,
                    )
                })?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Connects to NATS server.
    pub async fn connect_nats(&self) -> Result<NatsClient> {
        NatsClient::connect(self.nats.clone()).await.map_err(|e| {
            ServiceError::external_service_with_source("NATS", "Failed to connect to NATS", e)
        })
    }

    /// Loads the credentials file.
    pub async fn load_authenticator(&self) -> Result<Authenticator> {
        Authenticator::from_file(&self.credentials_file).await
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(types) = &builder.supported_types
            && let Some(unknown) = types
                .iter()
                .find(|value| value.trim().parse::<MediaType>().is_err())
        {
            return Err(format!("unknown content type '{}'", unknown.trim()));
        }

        if let Some(path) = &builder.credentials_file
            && path.as_os_str().is_empty()
        {
            return Err("Credentials file path cannot be empty".to_string());
        }

        if matches!(builder.storage_backend, Some(StorageBackend::Nats))
            && let Some(nats) = &builder.nats
        {
            nats.validate()?;
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::default(),
            nats: NatsConfig::default(),
            credentials_file: defaults::credentials_file(),
            supported_types: Vec::new(),
        }
    }
}
