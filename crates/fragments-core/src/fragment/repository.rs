//! Collection-level fragment operations.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use super::{Fragment, FragmentId, OwnerId};
use crate::registry::TypeRegistry;
use crate::storage::{FragmentList, FragmentStore};
use crate::{Error, Result, TRACING_TARGET_FRAGMENT};

/// Entry point for looking up, creating and deleting fragments.
///
/// Holds the backend and registry selected at startup and hands them to
/// every [`Fragment`] it produces.
#[derive(Clone)]
pub struct FragmentRepository {
    store: Arc<dyn FragmentStore>,
    registry: Arc<TypeRegistry>,
}

impl FragmentRepository {
    /// Creates a repository over the given backend and registry.
    pub fn new(store: Arc<dyn FragmentStore>, registry: Arc<TypeRegistry>) -> Self {
        Self { store, registry }
    }

    /// Returns the shared type registry.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns true if `value` is a content type fragments may be created with.
    pub fn is_supported_type(&self, value: &str) -> bool {
        self.registry.is_supported_type(value)
    }

    /// Builds a new, unsaved fragment.
    pub fn build(&self, owner_id: OwnerId, content_type: &str) -> Result<Fragment> {
        Fragment::new(
            self.store.clone(),
            self.registry.clone(),
            owner_id,
            content_type,
        )
    }

    /// Creates a fragment: metadata is saved first, then the data.
    pub async fn create(
        &self,
        owner_id: OwnerId,
        content_type: &str,
        data: Bytes,
    ) -> Result<Fragment> {
        let mut fragment = self.build(owner_id, content_type)?;
        fragment.save().await?;
        fragment.set_data(data).await?;

        tracing::info!(
            target: TRACING_TARGET_FRAGMENT,
            owner_id = %fragment.owner_id(),
            fragment_id = %fragment.id(),
            content_type = %fragment.content_type(),
            size = fragment.size(),
            "Fragment created"
        );
        Ok(fragment)
    }

    /// Lists an owner's fragments as ids or, with `expand`, full records.
    pub async fn by_user(&self, owner_id: &OwnerId, expand: bool) -> Result<FragmentList> {
        self.store.list_fragments(owner_id, expand).await
    }

    /// Loads a fragment, failing with [`Error::NotFound`] when it is missing.
    pub async fn by_id(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<Fragment> {
        let Some(metadata) = self.store.read_fragment(owner_id, id).await? else {
            tracing::debug!(
                target: TRACING_TARGET_FRAGMENT,
                owner_id = %owner_id,
                fragment_id = %id,
                "Fragment not found"
            );
            return Err(Error::not_found(owner_id, id));
        };

        Fragment::from_metadata(self.store.clone(), self.registry.clone(), metadata)
    }

    /// Deletes a fragment's metadata and data.
    ///
    /// Existence is checked first, so deleting a missing fragment fails with
    /// [`Error::NotFound`] every time.
    pub async fn delete(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<()> {
        self.by_id(owner_id, id).await?;
        self.store.delete_fragment(owner_id, id).await?;

        tracing::info!(
            target: TRACING_TARGET_FRAGMENT,
            owner_id = %owner_id,
            fragment_id = %id,
            "Fragment deleted"
        );
        Ok(())
    }
}

impl fmt::Debug for FragmentRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentRepository")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
