//! Object store bucket holding raw fragment data.

use std::sync::Arc;

use async_nats::jetstream;
use async_nats::jetstream::context::ObjectStoreErrorKind;
use async_nats::jetstream::object_store::{self, DeleteErrorKind, GetErrorKind};
use bytes::Bytes;
use tokio::io::AsyncReadExt;

use crate::kv::FragmentKey;
use crate::{Error, Result, TRACING_TARGET_OBJECT};

/// Raw fragment payloads keyed by [`FragmentKey`].
#[derive(Clone)]
pub struct DataStore {
    inner: Arc<object_store::ObjectStore>,
    bucket: Arc<String>,
}

impl DataStore {
    /// Gets the bucket, creating it when it does not exist yet.
    pub(crate) async fn new(jetstream: &jetstream::Context, bucket: &str) -> Result<Self> {
        let store = match jetstream.get_object_store(bucket).await {
            Ok(store) => {
                tracing::debug!(
                    target: TRACING_TARGET_OBJECT,
                    bucket = %bucket,
                    "Retrieved existing object store"
                );
                store
            }
            Err(e) if matches!(e.kind(), ObjectStoreErrorKind::GetStore) => {
                let config = object_store::Config {
                    bucket: bucket.to_string(),
                    description: Some("Fragment data".to_string()),
                    ..Default::default()
                };

                tracing::info!(
                    target: TRACING_TARGET_OBJECT,
                    bucket = %bucket,
                    "Creating new object store"
                );

                jetstream.create_object_store(config).await.map_err(|e| {
                    tracing::error!(
                        target: TRACING_TARGET_OBJECT,
                        bucket = %bucket,
                        error = %e,
                        "Failed to create object store"
                    );
                    Error::operation("create_object_store", e.to_string())
                })?
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_OBJECT,
                    bucket = %bucket,
                    error = %e,
                    "Failed to get object store"
                );
                return Err(Error::operation("get_object_store", e.to_string()));
            }
        };

        Ok(Self {
            inner: Arc::new(store),
            bucket: Arc::new(bucket.to_string()),
        })
    }

    /// Returns the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upserts a payload.
    pub async fn put(&self, key: &FragmentKey, data: &Bytes) -> Result<()> {
        let name = key.to_string();
        let meta = object_store::ObjectMetadata {
            name: name.clone(),
            ..Default::default()
        };

        let mut reader: &[u8] = data;
        let info = self.inner.put(meta, &mut reader).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_OBJECT,
                key = %name,
                error = %e,
                "Failed to upload object"
            );
            Error::operation("put", e.to_string())
        })?;

        tracing::debug!(
            target: TRACING_TARGET_OBJECT,
            key = %name,
            size = info.size,
            "Object stored"
        );
        Ok(())
    }

    /// Reads a payload; `None` when no object exists under the key.
    pub async fn get(&self, key: &FragmentKey) -> Result<Option<Bytes>> {
        let name = key.to_string();
        let mut object = match self.inner.get(&name).await {
            Ok(object) => object,
            Err(e) if matches!(e.kind(), GetErrorKind::NotFound) => {
                tracing::debug!(
                    target: TRACING_TARGET_OBJECT,
                    key = %name,
                    "Object not found"
                );
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_OBJECT,
                    key = %name,
                    error = %e,
                    "Failed to get object"
                );
                return Err(Error::operation("get", e.to_string()));
            }
        };

        let mut buffer = Vec::new();
        object
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| Error::operation("read", e.to_string()))?;

        Ok(Some(Bytes::from(buffer)))
    }

    /// Deletes a payload; a missing object is not an error.
    pub async fn delete(&self, key: &FragmentKey) -> Result<()> {
        let name = key.to_string();
        match self.inner.delete(&name).await {
            Ok(()) => {}
            Err(e) if matches!(e.kind(), DeleteErrorKind::NotFound) => {
                tracing::debug!(
                    target: TRACING_TARGET_OBJECT,
                    key = %name,
                    "Object already absent"
                );
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_OBJECT,
                    key = %name,
                    error = %e,
                    "Failed to delete object"
                );
                return Err(Error::operation("delete", e.to_string()));
            }
        }

        tracing::debug!(
            target: TRACING_TARGET_OBJECT,
            key = %name,
            "Object deleted"
        );
        Ok(())
    }
}
