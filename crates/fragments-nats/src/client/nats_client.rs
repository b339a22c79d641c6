//! NATS client wrapper and connection management.
//!
//! The underlying `async-nats` client multiplexes all operations over a
//! single connection, so one [`NatsClient`] is shared by every store.

use std::sync::Arc;
use std::time::Duration;

use async_nats::{Client, ConnectOptions, jetstream};
use tokio::time::timeout;

use super::nats_config::NatsConfig;
use crate::kv::MetadataStore;
use crate::object::DataStore;
use crate::store::NatsFragmentStore;
use crate::{Error, Result, TRACING_TARGET_CLIENT, TRACING_TARGET_CONNECTION};

/// NATS client wrapper with connection management.
///
/// This wrapper is cheaply cloneable and thread-safe.
#[derive(Debug, Clone)]
pub struct NatsClient {
    inner: Arc<NatsClientInner>,
}

#[derive(Debug)]
struct NatsClientInner {
    client: Client,
    jetstream: jetstream::Context,
    config: NatsConfig,
}

impl NatsClient {
    /// Create a new NATS client and connect
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CONNECTION)]
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        config.validate().map_err(Error::invalid_config)?;

        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            servers = %config.nats_url,
            "Connecting to NATS"
        );

        let mut connect_opts = ConnectOptions::new()
            .name(config.name())
            .ping_interval(config.ping_interval())
            .connection_timeout(config.connect_timeout());

        if let Some(token) = config.nats_token.clone() {
            connect_opts = connect_opts.token(token);
        }

        if let Some(max_reconnects) = config.max_reconnects_option() {
            connect_opts = connect_opts.max_reconnects(max_reconnects);
        }
        let reconnect_delay_ms = config.reconnect_delay().as_millis().min(u64::MAX as u128) as u64;
        connect_opts = connect_opts.reconnect_delay_callback(move |attempts| {
            Duration::from_millis(std::cmp::min(
                reconnect_delay_ms * 2_u64.pow(attempts.min(32) as u32),
                30_000,
            ))
        });

        let connect_timeout = config.connect_timeout();
        let client = timeout(
            connect_timeout,
            async_nats::connect_with_options(config.nats_url.as_str(), connect_opts),
        )
        .await
        .map_err(|_| Error::timeout(connect_timeout))?
        .map_err(|e| Error::Connection(Box::new(e)))?;

        let jetstream = jetstream::new(client.clone());

        let server_info = client.server_info();
        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            server_host = %server_info.host,
            server_version = %server_info.version,
            max_payload = server_info.max_payload,
            "Connected to NATS"
        );

        Ok(Self {
            inner: Arc::new(NatsClientInner {
                client,
                jetstream,
                config,
            }),
        })
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &NatsConfig {
        &self.inner.config
    }

    /// Test connectivity by flushing pending messages.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn ping(&self) -> Result<Duration> {
        let start = std::time::Instant::now();
        let limit = Duration::from_secs(10);

        timeout(limit, self.inner.client.flush())
            .await
            .map_err(|_| Error::timeout(limit))?
            .map_err(|e| Error::Connection(Box::new(e)))?;

        let elapsed = start.elapsed();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            duration_ms = elapsed.as_millis(),
            "NATS ping successful"
        );
        Ok(elapsed)
    }

    /// Check if the client is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(
            self.inner.client.connection_state(),
            async_nats::connection::State::Connected
        )
    }

    /// Get or create the metadata key-value bucket.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn metadata_store(&self) -> Result<MetadataStore> {
        MetadataStore::new(&self.inner.jetstream, self.config().metadata_bucket()).await
    }

    /// Get or create the data object store bucket.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn data_store(&self) -> Result<DataStore> {
        DataStore::new(&self.inner.jetstream, self.config().data_bucket()).await
    }

    /// Builds the fragment storage backend over both buckets.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn fragment_store(&self) -> Result<NatsFragmentStore> {
        let metadata = self.metadata_store().await?;
        let data = self.data_store().await?;
        Ok(NatsFragmentStore::new(metadata, data))
    }
}
