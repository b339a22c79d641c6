//! Key-value bucket holding fragment metadata records.

use async_nats::jetstream::{self, kv};
use fragments_core::fragment::{FragmentMetadata, OwnerId};
use futures::StreamExt;

use super::FragmentKey;
use crate::{Error, Result, TRACING_TARGET_KV};

/// JSON-encoded [`FragmentMetadata`] records keyed by [`FragmentKey`].
#[derive(Clone)]
pub struct MetadataStore {
    store: kv::Store,
    bucket: String,
}

impl MetadataStore {
    /// Gets the bucket, creating it when it does not exist yet.
    #[tracing::instrument(skip(jetstream), target = TRACING_TARGET_KV)]
    pub(crate) async fn new(jetstream: &jetstream::Context, bucket: &str) -> Result<Self> {
        let store = match jetstream.get_key_value(bucket).await {
            Ok(store) => {
                tracing::debug!(
                    target: TRACING_TARGET_KV,
                    bucket = %bucket,
                    "Using existing KV bucket"
                );
                store
            }
            Err(_) => {
                tracing::info!(
                    target: TRACING_TARGET_KV,
                    bucket = %bucket,
                    "Creating new KV bucket"
                );
                let config = kv::Config {
                    bucket: bucket.to_string(),
                    description: "Fragment metadata records".to_string(),
                    history: 1,
                    ..Default::default()
                };
                jetstream
                    .create_key_value(config)
                    .await
                    .map_err(|e| Error::operation("kv_create", e.to_string()))?
            }
        };

        Ok(Self {
            store,
            bucket: bucket.to_string(),
        })
    }

    /// Returns the bucket name.
    #[inline]
    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }

    /// Upserts a record.
    #[tracing::instrument(skip(self, metadata), target = TRACING_TARGET_KV)]
    pub async fn put(&self, key: &FragmentKey, metadata: &FragmentMetadata) -> Result<u64> {
        let key_str = key.to_string();
        let json = serde_json::to_vec(metadata)?;
        let size = json.len();
        let revision = self
            .store
            .put(&key_str, json.into())
            .await
            .map_err(|e| Error::operation("kv_put", e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET_KV,
            key = %key_str,
            revision = revision,
            size_bytes = size,
            "Put metadata record"
        );
        Ok(revision)
    }

    /// Reads a record; `None` when the key is unset or was purged.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_KV)]
    pub async fn get(&self, key: &FragmentKey) -> Result<Option<FragmentMetadata>> {
        let key_str = key.to_string();
        let value = self
            .store
            .get(&key_str)
            .await
            .map_err(|e| Error::operation("kv_get", e.to_string()))?;

        match value {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => {
                tracing::debug!(
                    target: TRACING_TARGET_KV,
                    key = %key_str,
                    "Key not found in KV store"
                );
                Ok(None)
            }
        }
    }

    /// Removes a record and its history.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_KV)]
    pub async fn delete(&self, key: &FragmentKey) -> Result<()> {
        let key_str = key.to_string();
        self.store
            .purge(&key_str)
            .await
            .map_err(|e| Error::operation("kv_delete", e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET_KV,
            key = %key_str,
            "Deleted metadata record"
        );
        Ok(())
    }

    /// Returns all keys belonging to `owner_id`.
    ///
    /// Scans the bucket's key list and keeps keys with the owner's prefix.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_KV)]
    pub async fn keys_for_owner(&self, owner_id: &OwnerId) -> Result<Vec<FragmentKey>> {
        let prefix = FragmentKey::owner_prefix(owner_id);
        let mut key_stream = self
            .store
            .keys()
            .await
            .map_err(|e| Error::operation("kv_keys", e.to_string()))?;

        let mut keys = Vec::new();
        while let Some(key_result) = key_stream.next().await {
            match key_result {
                Ok(key_str) if key_str.starts_with(&prefix) => match key_str.parse() {
                    Ok(key) => keys.push(key),
                    Err(e) => {
                        tracing::warn!(
                            target: TRACING_TARGET_KV,
                            key = %key_str,
                            error = %e,
                            "Skipping malformed key"
                        );
                    }
                },
                Ok(_) => {}
                Err(e) => {
                    return Err(Error::operation("kv_keys", e.to_string()));
                }
            }
        }

        keys.sort_by(|a: &FragmentKey, b| a.id.cmp(&b.id));

        tracing::debug!(
            target: TRACING_TARGET_KV,
            count = keys.len(),
            bucket = %self.bucket,
            "Listed owner keys"
        );
        Ok(keys)
    }
}
