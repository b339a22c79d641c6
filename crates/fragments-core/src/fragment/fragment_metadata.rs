//! Persisted fragment metadata record.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{FragmentId, OwnerId};

/// The metadata record stored for every fragment.
///
/// This is the unit the storage backend persists in its metadata namespace;
/// raw bytes live separately under the same `(owner_id, id)` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentMetadata {
    pub id: FragmentId,
    pub owner_id: OwnerId,
    pub created: Timestamp,
    pub updated: Timestamp,
    /// Content type string as declared at creation, parameters included.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Byte length of the stored data.
    pub size: u64,
}
