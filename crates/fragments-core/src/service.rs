//! Request-scoped fragment operations for the HTTP layer.

use std::sync::Arc;

use bytes::Bytes;

use crate::convert::ConversionEngine;
use crate::fragment::{Fragment, FragmentId, FragmentRepository, OwnerId};
use crate::media::ContentType;
use crate::registry::TypeRegistry;
use crate::storage::{FragmentList, FragmentStore};
use crate::{Error, Result, TRACING_TARGET_SERVICE};

/// Fragment bytes together with the content type they should be served as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentData {
    pub data: Bytes,
    pub content_type: String,
}

/// Create, list, read, update and delete operations over one backend.
#[derive(Debug, Clone)]
pub struct FragmentService {
    repository: FragmentRepository,
    engine: ConversionEngine,
}

impl FragmentService {
    /// Creates a service over the given backend and registry.
    pub fn new(store: Arc<dyn FragmentStore>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            repository: FragmentRepository::new(store, registry.clone()),
            engine: ConversionEngine::new(registry),
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &FragmentRepository {
        &self.repository
    }

    /// Returns the shared type registry.
    pub fn registry(&self) -> &TypeRegistry {
        self.engine.registry()
    }

    /// Stores `data` as a new fragment of the given content type.
    pub async fn create(&self, owner_id: OwnerId, content_type: &str, data: Bytes) -> Result<Fragment> {
        self.repository.create(owner_id, content_type, data).await
    }

    /// Lists an owner's fragments.
    pub async fn list(&self, owner_id: &OwnerId, expand: bool) -> Result<FragmentList> {
        self.repository.by_user(owner_id, expand).await
    }

    /// Loads a fragment's metadata.
    pub async fn info(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<Fragment> {
        self.repository.by_id(owner_id, id).await
    }

    /// Reads a fragment's data, converted when `extension` is given.
    ///
    /// Without an extension the stored bytes are returned with the stored
    /// content type, parameters included. Missing data is reported as
    /// [`Error::NotFound`].
    pub async fn read(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
        extension: Option<&str>,
    ) -> Result<FragmentData> {
        let fragment = self.repository.by_id(owner_id, id).await?;
        let Some(data) = fragment.get_data().await? else {
            tracing::warn!(
                target: TRACING_TARGET_SERVICE,
                owner_id = %owner_id,
                fragment_id = %id,
                "Fragment metadata has no data"
            );
            return Err(Error::not_found(owner_id, id));
        };

        let Some(extension) = extension else {
            return Ok(FragmentData {
                data,
                content_type: fragment.content_type().to_string(),
            });
        };

        let (data, target) = self
            .engine
            .convert(data, fragment.mime_type(), extension)
            .await?;

        Ok(FragmentData {
            data,
            content_type: target.essence().to_owned(),
        })
    }

    /// Replaces a fragment's data.
    ///
    /// The declared content type must match the stored one; a different or
    /// unparseable value fails with [`Error::TypeImmutable`] and leaves the
    /// fragment untouched.
    pub async fn update(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
        data: Bytes,
        declared_content_type: &str,
    ) -> Result<Fragment> {
        if declared_content_type.trim().is_empty() {
            return Err(Error::validation("type is required"));
        }

        let mut fragment = self.repository.by_id(owner_id, id).await?;
        let same_type = ContentType::parse(declared_content_type)
            .is_ok_and(|declared| &declared == fragment.content_type());
        if !same_type {
            tracing::warn!(
                target: TRACING_TARGET_SERVICE,
                owner_id = %owner_id,
                fragment_id = %id,
                stored = %fragment.content_type(),
                declared = %declared_content_type,
                "Rejected fragment type change"
            );
            return Err(Error::type_immutable(
                fragment.content_type().as_str(),
                declared_content_type,
            ));
        }

        fragment.set_data(data).await?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            owner_id = %owner_id,
            fragment_id = %id,
            size = fragment.size(),
            "Fragment data replaced"
        );
        Ok(fragment)
    }

    /// Deletes a fragment.
    pub async fn delete(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<()> {
        self.repository.delete(owner_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::storage::MemoryStore;

    fn service() -> FragmentService {
        FragmentService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(TypeRegistry::default()),
        )
    }

    fn owner() -> OwnerId {
        OwnerId::new("owner")
    }

    #[tokio::test]
    async fn plain_text_round_trip() {
        let service = service();
        let fragment = service
            .create(owner(), "text/plain", Bytes::from_static(b"hello"))
            .await
            .unwrap();
        assert_eq!(fragment.metadata().content_type, "text/plain");
        assert_eq!(fragment.size(), 5);

        let read = service.read(&owner(), fragment.id(), None).await.unwrap();
        assert_eq!(read.data, Bytes::from_static(b"hello"));
        assert_eq!(read.content_type, "text/plain");
    }

    #[tokio::test]
    async fn read_keeps_stored_parameters() {
        let service = service();
        let fragment = service
            .create(owner(), "text/plain; charset=utf-8", Bytes::from_static(b"hi"))
            .await
            .unwrap();

        let read = service.read(&owner(), fragment.id(), None).await.unwrap();
        assert_eq!(read.content_type, "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn markdown_read_as_html() {
        let service = service();
        let fragment = service
            .create(owner(), "text/markdown", Bytes::from_static(b"## Title"))
            .await
            .unwrap();

        let read = service
            .read(&owner(), fragment.id(), Some("html"))
            .await
            .unwrap();
        assert_eq!(read.content_type, "text/html");
        assert!(std::str::from_utf8(&read.data).unwrap().contains("<h2>Title</h2>"));
    }

    #[tokio::test]
    async fn plain_text_as_html_is_unsupported() {
        let service = service();
        let fragment = service
            .create(owner(), "text/plain", Bytes::from_static(b"hello"))
            .await
            .unwrap();

        let err = service
            .read(&owner(), fragment.id(), Some("html"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
    }

    #[tokio::test]
    async fn json_read_as_yaml() {
        let service = service();
        let fragment = service
            .create(owner(), "application/json", Bytes::from_static(br#"{"a":1}"#))
            .await
            .unwrap();

        let read = service
            .read(&owner(), fragment.id(), Some("yaml"))
            .await
            .unwrap();
        assert_eq!(read.content_type, "application/yaml");
        assert!(std::str::from_utf8(&read.data).unwrap().contains("a: 1"));
    }

    #[tokio::test]
    async fn create_unsupported_type_fails_validation() {
        let err = service()
            .create(owner(), "video/mp4", Bytes::from_static(b"..."))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.is_unsupported_type());
    }

    #[tokio::test]
    async fn update_with_different_type_is_rejected() {
        let service = service();
        let fragment = service
            .create(owner(), "text/plain", Bytes::from_static(b"hello"))
            .await
            .unwrap();

        let err = service
            .update(
                &owner(),
                fragment.id(),
                Bytes::from_static(b"<p>x</p>"),
                "text/html",
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeImmutable);

        let stored = service.info(&owner(), fragment.id()).await.unwrap();
        assert_eq!(stored.metadata(), fragment.metadata());
        let read = service.read(&owner(), fragment.id(), None).await.unwrap();
        assert_eq!(read.data, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn update_replaces_data() {
        let service = service();
        let fragment = service
            .create(owner(), "text/plain", Bytes::from_static(b"hello"))
            .await
            .unwrap();

        let updated = service
            .update(
                &owner(),
                fragment.id(),
                Bytes::from_static(b"hello world"),
                "TEXT/PLAIN",
            )
            .await
            .unwrap();
        assert_eq!(updated.size(), 11);
        assert_eq!(updated.created(), fragment.created());
        assert!(updated.updated() >= fragment.updated());
        assert_eq!(updated.metadata().content_type, "text/plain");
    }

    #[tokio::test]
    async fn update_missing_fragment() {
        let err = service()
            .update(
                &owner(),
                &FragmentId::new("missing"),
                Bytes::new(),
                "text/plain",
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_then_read() {
        let service = service();
        let fragment = service
            .create(owner(), "text/csv", Bytes::from_static(b"a,b\n1,2\n"))
            .await
            .unwrap();

        service.delete(&owner(), fragment.id()).await.unwrap();

        let err = service.read(&owner(), fragment.id(), None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = service.delete(&owner(), fragment.id()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
