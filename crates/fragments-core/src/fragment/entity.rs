//! The fragment entity.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use jiff::Timestamp;

use super::{FragmentId, FragmentMetadata, OwnerId};
use crate::media::{ContentType, MediaType};
use crate::registry::TypeRegistry;
use crate::storage::FragmentStore;
use crate::{Error, Result, TRACING_TARGET_FRAGMENT};

/// One fragment's validated metadata, bound to the backend that persists it.
///
/// All persistence goes through the entity so that `size` and `updated`
/// always track the stored data.
#[derive(Clone)]
pub struct Fragment {
    metadata: FragmentMetadata,
    content_type: ContentType,
    store: Arc<dyn FragmentStore>,
    registry: Arc<TypeRegistry>,
}

impl Fragment {
    /// Creates a new, unsaved fragment with a fresh id and timestamps.
    ///
    /// Fails with a validation error when `owner_id` or `content_type` is
    /// empty, or the content type is not enabled in the registry.
    pub fn new(
        store: Arc<dyn FragmentStore>,
        registry: Arc<TypeRegistry>,
        owner_id: OwnerId,
        content_type: &str,
    ) -> Result<Self> {
        let now = Timestamp::now();
        let metadata = FragmentMetadata {
            id: FragmentId::generate(),
            owner_id,
            created: now,
            updated: now,
            content_type: content_type.to_owned(),
            size: 0,
        };

        Self::from_metadata(store, registry, metadata)
    }

    /// Rebuilds a fragment from a stored record, re-applying validation.
    ///
    /// Every field of `metadata` is kept as is.
    pub fn from_metadata(
        store: Arc<dyn FragmentStore>,
        registry: Arc<TypeRegistry>,
        metadata: FragmentMetadata,
    ) -> Result<Self> {
        if metadata.owner_id.is_empty() {
            return Err(Error::validation("owner id is required"));
        }
        if metadata.content_type.trim().is_empty() {
            return Err(Error::validation("type is required"));
        }
        if metadata.id.is_empty() {
            return Err(Error::validation("id must not be empty"));
        }

        let content_type = registry.parse(&metadata.content_type)?;

        Ok(Self {
            metadata,
            content_type,
            store,
            registry,
        })
    }

    #[inline]
    pub fn id(&self) -> &FragmentId {
        &self.metadata.id
    }

    #[inline]
    pub fn owner_id(&self) -> &OwnerId {
        &self.metadata.owner_id
    }

    /// Returns the parsed content type, parameters included.
    #[inline]
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.metadata.size
    }

    #[inline]
    pub fn created(&self) -> Timestamp {
        self.metadata.created
    }

    #[inline]
    pub fn updated(&self) -> Timestamp {
        self.metadata.updated
    }

    /// Returns the persisted metadata record.
    #[inline]
    pub fn metadata(&self) -> &FragmentMetadata {
        &self.metadata
    }

    /// Consumes the entity, returning its metadata record.
    pub fn into_metadata(self) -> FragmentMetadata {
        self.metadata
    }

    /// Returns the base media type with parameters stripped.
    #[inline]
    pub fn mime_type(&self) -> MediaType {
        self.content_type.media_type()
    }

    /// Returns true for `text/*` fragments.
    pub fn is_text(&self) -> bool {
        self.mime_type().is_text()
    }

    /// Returns the types this fragment may be converted into.
    pub fn formats(&self) -> Vec<MediaType> {
        self.registry.formats(self.mime_type())
    }

    /// Persists the metadata record and refreshes `updated`.
    pub async fn save(&mut self) -> Result<()> {
        let previous = self.metadata.updated;
        self.touch();

        if let Err(err) = self.store.write_fragment(&self.metadata).await {
            self.metadata.updated = previous;
            tracing::error!(
                target: TRACING_TARGET_FRAGMENT,
                owner_id = %self.metadata.owner_id,
                fragment_id = %self.metadata.id,
                error = %err,
                "Failed to save fragment metadata"
            );
            return Err(err);
        }

        Ok(())
    }

    /// Reads the stored data; `None` if none was ever written.
    pub async fn get_data(&self) -> Result<Option<Bytes>> {
        self.store
            .read_fragment_data(&self.metadata.owner_id, &self.metadata.id)
            .await
    }

    /// Replaces the stored data and re-persists metadata with the new size.
    ///
    /// On failure the in-memory `size` and `updated` are restored, so the
    /// entity never claims a size that was not written.
    pub async fn set_data(&mut self, data: Bytes) -> Result<()> {
        let (previous_size, previous_updated) = (self.metadata.size, self.metadata.updated);
        self.metadata.size = data.len() as u64;
        self.touch();

        if let Err(err) = self
            .store
            .write_fragment_with_data(&self.metadata, data)
            .await
        {
            self.metadata.size = previous_size;
            self.metadata.updated = previous_updated;
            tracing::error!(
                target: TRACING_TARGET_FRAGMENT,
                owner_id = %self.metadata.owner_id,
                fragment_id = %self.metadata.id,
                error = %err,
                "Failed to write fragment data"
            );
            return Err(err);
        }

        tracing::debug!(
            target: TRACING_TARGET_FRAGMENT,
            owner_id = %self.metadata.owner_id,
            fragment_id = %self.metadata.id,
            size = self.metadata.size,
            "Fragment data updated"
        );
        Ok(())
    }

    /// Sets `updated` to now without ever moving it backwards.
    fn touch(&mut self) {
        self.metadata.updated = Timestamp::now().max(self.metadata.updated);
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
