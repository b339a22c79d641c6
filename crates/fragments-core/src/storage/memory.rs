//! In-memory storage backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{FragmentList, FragmentStore};
use crate::fragment::{FragmentId, FragmentMetadata, OwnerId};
use crate::{Error, Result, TRACING_TARGET_STORAGE};

/// A two-level key/value table: primary key, then secondary key.
///
/// Secondary keys are kept sorted, so queries return values in key order.
#[derive(Debug, Clone)]
pub struct MemoryDb<V> {
    entries: HashMap<String, BTreeMap<String, V>>,
}

impl<V: Clone> MemoryDb<V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the value stored under both keys.
    pub fn get(&self, primary: &str, secondary: &str) -> Option<&V> {
        self.entries.get(primary)?.get(secondary)
    }

    /// Inserts or replaces the value stored under both keys.
    pub fn put(&mut self, primary: &str, secondary: &str, value: V) {
        self.entries
            .entry(primary.to_owned())
            .or_default()
            .insert(secondary.to_owned(), value);
    }

    /// Returns all values stored under the primary key.
    pub fn query(&self, primary: &str) -> Vec<V> {
        self.entries
            .get(primary)
            .map(|values| values.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Removes the value stored under both keys, returning it.
    pub fn del(&mut self, primary: &str, secondary: &str) -> Option<V> {
        let values = self.entries.get_mut(primary)?;
        let removed = values.remove(secondary);
        if values.is_empty() {
            self.entries.remove(primary);
        }
        removed
    }
}

impl<V: Clone> Default for MemoryDb<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct Tables {
    metadata: MemoryDb<FragmentMetadata>,
    data: MemoryDb<Bytes>,
}

/// Process-local backend keeping both namespaces behind a single lock.
///
/// Cloning shares the underlying tables. Contents are lost when the last
/// clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FragmentStore for MemoryStore {
    async fn write_fragment(&self, metadata: &FragmentMetadata) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .metadata
            .put(&metadata.owner_id, &metadata.id, metadata.clone());

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            owner_id = %metadata.owner_id,
            fragment_id = %metadata.id,
            "Wrote fragment metadata"
        );
        Ok(())
    }

    async fn read_fragment(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
    ) -> Result<Option<FragmentMetadata>> {
        let tables = self.tables.read().await;
        Ok(tables.metadata.get(owner_id, id).cloned())
    }

    async fn write_fragment_data(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
        data: Bytes,
    ) -> Result<()> {
        let size = data.len();
        let mut tables = self.tables.write().await;
        tables.data.put(owner_id, id, data);

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            owner_id = %owner_id,
            fragment_id = %id,
            size,
            "Wrote fragment data"
        );
        Ok(())
    }

    async fn read_fragment_data(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
    ) -> Result<Option<Bytes>> {
        let tables = self.tables.read().await;
        Ok(tables.data.get(owner_id, id).cloned())
    }

    async fn list_fragments(&self, owner_id: &OwnerId, expand: bool) -> Result<FragmentList> {
        let tables = self.tables.read().await;
        let records = tables.metadata.query(owner_id);
        Ok(FragmentList::from_records(records, expand))
    }

    async fn delete_fragment(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.metadata.del(owner_id, id).is_none() {
            tracing::warn!(
                target: TRACING_TARGET_STORAGE,
                owner_id = %owner_id,
                fragment_id = %id,
                "Missing metadata entry on delete"
            );
            return Err(Error::not_found(owner_id, id));
        }
        tables.data.del(owner_id, id);

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            owner_id = %owner_id,
            fragment_id = %id,
            "Deleted fragment metadata and data"
        );
        Ok(())
    }

    async fn write_fragment_with_data(&self, metadata: &FragmentMetadata, data: Bytes) -> Result<()> {
        let size = data.len();
        let mut tables = self.tables.write().await;
        tables.data.put(&metadata.owner_id, &metadata.id, data);
        tables
            .metadata
            .put(&metadata.owner_id, &metadata.id, metadata.clone());

        tracing::debug!(
            target: TRACING_TARGET_STORAGE,
            owner_id = %metadata.owner_id,
            fragment_id = %metadata.id,
            size,
            "Wrote fragment data and metadata"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::ErrorKind;

    fn record(owner: &str, id: &str) -> FragmentMetadata {
        let now = Timestamp::now();
        FragmentMetadata {
            id: FragmentId::new(id),
            owner_id: OwnerId::new(owner),
            created: now,
            updated: now,
            content_type: "text/plain".into(),
            size: 0,
        }
    }

    #[test]
    fn memory_db_two_level_keys() {
        let mut db = MemoryDb::new();
        db.put("a", "1", 10);
        db.put("a", "2", 20);
        db.put("b", "1", 30);

        assert_eq!(db.get("a", "2"), Some(&20));
        assert_eq!(db.query("a"), vec![10, 20]);
        assert!(db.query("missing").is_empty());

        assert_eq!(db.del("a", "1"), Some(10));
        assert_eq!(db.del("a", "1"), None);
        assert_eq!(db.query("a"), vec![20]);
    }

    #[tokio::test]
    async fn absent_keys_read_as_none() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("owner");
        let id = FragmentId::new("id");

        assert!(store.read_fragment(&owner, &id).await.unwrap().is_none());
        assert!(store.read_fragment_data(&owner, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn data_is_independent_of_metadata() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("owner");
        let id = FragmentId::new("id");

        store
            .write_fragment_data(&owner, &id, Bytes::from_static(b"raw"))
            .await
            .unwrap();
        assert!(store.read_fragment(&owner, &id).await.unwrap().is_none());
        assert_eq!(
            store.read_fragment_data(&owner, &id).await.unwrap(),
            Some(Bytes::from_static(b"raw"))
        );
    }

    #[tokio::test]
    async fn list_by_owner() {
        let store = MemoryStore::new();
        store.write_fragment(&record("a", "1")).await.unwrap();
        store.write_fragment(&record("a", "2")).await.unwrap();
        store.write_fragment(&record("b", "3")).await.unwrap();

        let ids = store
            .list_fragments(&OwnerId::new("a"), false)
            .await
            .unwrap();
        assert_eq!(
            ids,
            FragmentList::Ids(vec![FragmentId::new("1"), FragmentId::new("2")])
        );

        let expanded = store
            .list_fragments(&OwnerId::new("b"), true)
            .await
            .unwrap();
        assert!(matches!(expanded, FragmentList::Expanded(_)));
        assert_eq!(expanded.ids(), vec![&FragmentId::new("3")]);

        let empty = store
            .list_fragments(&OwnerId::new("nobody"), true)
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_both_namespaces() {
        let store = MemoryStore::new();
        let metadata = record("owner", "id");
        store
            .write_fragment_with_data(&metadata, Bytes::from_static(b"x"))
            .await
            .unwrap();

        store
            .delete_fragment(&metadata.owner_id, &metadata.id)
            .await
            .unwrap();
        assert!(store.read_fragment(&metadata.owner_id, &metadata.id).await.unwrap().is_none());
        assert!(
            store
                .read_fragment_data(&metadata.owner_id, &metadata.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_missing_metadata_keeps_data() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("owner");
        let id = FragmentId::new("id");
        store
            .write_fragment_data(&owner, &id, Bytes::from_static(b"orphan"))
            .await
            .unwrap();

        let err = store.delete_fragment(&owner, &id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(store.read_fragment_data(&owner, &id).await.unwrap().is_some());
    }
}
