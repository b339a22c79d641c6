//! [`FragmentStore`] backed by NATS JetStream.

use async_trait::async_trait;
use bytes::Bytes;
use fragments_core::fragment::{FragmentId, FragmentMetadata, OwnerId};
use fragments_core::storage::{FragmentList, FragmentStore};
use fragments_core::{Error as CoreError, Result as CoreResult};

use crate::kv::{FragmentKey, MetadataStore};
use crate::object::DataStore;

/// Durable fragment backend: metadata in a KV bucket, data in an object store.
#[derive(Clone)]
pub struct NatsFragmentStore {
    metadata: MetadataStore,
    data: DataStore,
}

impl NatsFragmentStore {
    /// Creates a backend over the given buckets.
    pub fn new(metadata: MetadataStore, data: DataStore) -> Self {
        Self { metadata, data }
    }
}

#[async_trait]
impl FragmentStore for NatsFragmentStore {
    async fn write_fragment(&self, metadata: &FragmentMetadata) -> CoreResult<()> {
        let key = FragmentKey::new(&metadata.owner_id, &metadata.id);
        self.metadata
            .put(&key, metadata)
            .await
            .map_err(|e| CoreError::storage("write_fragment", e))?;
        Ok(())
    }

    async fn read_fragment(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
    ) -> CoreResult<Option<FragmentMetadata>> {
        self.metadata
            .get(&FragmentKey::new(owner_id, id))
            .await
            .map_err(|e| CoreError::storage("read_fragment", e))
    }

    async fn write_fragment_data(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
        data: Bytes,
    ) -> CoreResult<()> {
        self.data
            .put(&FragmentKey::new(owner_id, id), &data)
            .await
            .map_err(|e| CoreError::storage("write_fragment_data", e))
    }

    async fn read_fragment_data(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
    ) -> CoreResult<Option<Bytes>> {
        self.data
            .get(&FragmentKey::new(owner_id, id))
            .await
            .map_err(|e| CoreError::storage("read_fragment_data", e))
    }

    async fn list_fragments(&self, owner_id: &OwnerId, expand: bool) -> CoreResult<FragmentList> {
        let keys = self
            .metadata
            .keys_for_owner(owner_id)
            .await
            .map_err(|e| CoreError::storage("list_fragments", e))?;

        if !expand {
            return Ok(FragmentList::Ids(keys.into_iter().map(|key| key.id).collect()));
        }

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            // A key purged between the scan and this read is skipped.
            if let Some(record) = self
                .metadata
                .get(&key)
                .await
                .map_err(|e| CoreError::storage("list_fragments", e))?
            {
                records.push(record);
            }
        }

        Ok(FragmentList::Expanded(records))
    }

    async fn delete_fragment(&self, owner_id: &OwnerId, id: &FragmentId) -> CoreResult<()> {
        let key = FragmentKey::new(owner_id, id);
        let exists = self
            .metadata
            .get(&key)
            .await
            .map_err(|e| CoreError::storage("delete_fragment", e))?
            .is_some();
        if !exists {
            return Err(CoreError::not_found(owner_id, id));
        }

        self.metadata
            .delete(&key)
            .await
            .map_err(|e| CoreError::storage("delete_fragment", e))?;
        self.data
            .delete(&key)
            .await
            .map_err(|e| CoreError::storage("delete_fragment_data", e))
    }
}
