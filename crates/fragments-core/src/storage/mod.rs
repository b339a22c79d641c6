//! Storage backend abstraction.
//!
//! A backend persists two independent namespaces keyed by
//! `(owner_id, fragment_id)`: metadata records and raw data. It enforces no
//! ordering between them; the fragment entity decides what is written when.

mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

pub use self::memory::{MemoryDb, MemoryStore};
use crate::Result;
use crate::fragment::{FragmentId, FragmentMetadata, OwnerId};

/// Result of listing an owner's fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FragmentList {
    /// Identifiers only.
    Ids(Vec<FragmentId>),
    /// Full metadata records.
    Expanded(Vec<FragmentMetadata>),
}

impl FragmentList {
    /// Returns the number of listed fragments.
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Expanded(records) => records.len(),
        }
    }

    /// Returns true if the owner has no fragments.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the listed identifiers regardless of expansion.
    pub fn ids(&self) -> Vec<&FragmentId> {
        match self {
            Self::Ids(ids) => ids.iter().collect(),
            Self::Expanded(records) => records.iter().map(|record| &record.id).collect(),
        }
    }

    /// Builds a list from full records, dropping them to ids unless `expand`.
    pub fn from_records(records: Vec<FragmentMetadata>, expand: bool) -> Self {
        if expand {
            Self::Expanded(records)
        } else {
            Self::Ids(records.into_iter().map(|record| record.id).collect())
        }
    }
}

/// Key/value persistence for fragment metadata and data.
///
/// Implementations must behave identically from the caller's perspective:
/// reads of unset keys return `None`, and deleting a fragment whose metadata
/// is missing fails with [`Error::NotFound`](crate::Error::NotFound) without
/// touching data.
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// Upserts a metadata record.
    async fn write_fragment(&self, metadata: &FragmentMetadata) -> Result<()>;

    /// Reads a metadata record.
    async fn read_fragment(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
    ) -> Result<Option<FragmentMetadata>>;

    /// Upserts a data payload, whether or not metadata exists.
    async fn write_fragment_data(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
        data: Bytes,
    ) -> Result<()>;

    /// Reads a data payload.
    async fn read_fragment_data(&self, owner_id: &OwnerId, id: &FragmentId)
    -> Result<Option<Bytes>>;

    /// Lists the owner's fragments; empty for an unknown owner.
    async fn list_fragments(&self, owner_id: &OwnerId, expand: bool) -> Result<FragmentList>;

    /// Removes metadata and data for the key.
    async fn delete_fragment(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<()>;

    /// Writes data and the metadata describing it.
    ///
    /// The default writes data first and metadata second, so a failure
    /// between the two leaves the previous metadata in place. Backends able
    /// to apply both in one step should override this.
    async fn write_fragment_with_data(&self, metadata: &FragmentMetadata, data: Bytes) -> Result<()> {
        self.write_fragment_data(&metadata.owner_id, &metadata.id, data)
            .await?;
        self.write_fragment(metadata).await
    }
}
