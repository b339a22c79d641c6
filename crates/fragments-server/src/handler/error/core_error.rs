//! Fragment error to HTTP error conversion.

use fragments_core::Error as CoreError;

use super::http_error::{Error as HttpError, ErrorKind};

impl From<CoreError> for HttpError<'static> {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation {
                unsupported_type: true,
                reason,
            } => ErrorKind::UnsupportedMediaType
                .with_message("Unsupported Content-Type")
                .with_context(reason),

            CoreError::Validation { reason, .. } => ErrorKind::BadRequest.with_message(reason),

            CoreError::NotFound { owner_id, id } => ErrorKind::NotFound
                .with_message("fragment not found")
                .with_resource(id.to_string())
                .with_context(format!("owner: {owner_id}")),

            CoreError::TypeImmutable { stored, declared } => ErrorKind::BadRequest
                .with_message("a fragment's type can not be changed after it is created")
                .with_context(format!("stored '{stored}', got '{declared}'")),

            CoreError::UnsupportedConversion {
                source_type,
                target,
            } => ErrorKind::UnsupportedMediaType.with_message(format!(
                "a {source_type} fragment cannot be returned as {target}"
            )),

            error @ CoreError::Storage { .. } => ErrorKind::InternalServerError
                .with_message("unable to access fragment storage")
                .with_context(error.to_string()),

            error @ CoreError::Conversion { .. } => ErrorKind::InternalServerError
                .with_message("unable to convert fragment")
                .with_context(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use fragments_core::fragment::{FragmentId, OwnerId};
    use fragments_core::media::MediaType;

    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let error = HttpError::from(CoreError::validation("size must be a number"));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("size must be a number"));
    }

    #[test]
    fn unsupported_type_maps_to_415() {
        let error = HttpError::from(CoreError::unsupported_type("application/x-unknown"));
        assert_eq!(error.kind().status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(error.message(), Some("Unsupported Content-Type"));
    }

    #[test]
    fn not_found_keeps_fragment_id() {
        let error = HttpError::from(CoreError::not_found(
            &OwnerId::new("owner"),
            &FragmentId::new("abc"),
        ));
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.resource(), Some("abc"));
    }

    #[test]
    fn type_change_maps_to_bad_request() {
        let error = HttpError::from(CoreError::type_immutable("text/plain", "text/html"));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(error.context().is_some_and(|c| c.contains("text/html")));
    }

    #[test]
    fn unsupported_conversion_maps_to_415() {
        let error = HttpError::from(CoreError::unsupported_conversion(
            MediaType::TextPlain,
            "text/html",
        ));
        assert_eq!(error.kind(), ErrorKind::UnsupportedMediaType);
        assert_eq!(
            error.message(),
            Some("a text/plain fragment cannot be returned as text/html")
        );
    }

    #[test]
    fn storage_maps_to_internal_error() {
        let error = HttpError::from(CoreError::storage("read_fragment", "bucket offline"));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert!(error.context().is_some_and(|c| c.contains("bucket offline")));
    }
}
