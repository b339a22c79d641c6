//! Error types for fragment operations.

use strum::{AsRefStr, IntoStaticStr};

use crate::fragment::{FragmentId, OwnerId};
use crate::media::MediaType;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for all fragment operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors produced by [`Error::kind`].
///
/// Layers above the core match on the kind rather than on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input: bad type, bad size or bad data shape.
    Validation,
    /// No fragment exists for the requested key.
    NotFound,
    /// Attempt to change the type of an existing fragment.
    TypeImmutable,
    /// The requested conversion is not offered for this fragment.
    UnsupportedConversion,
    /// The storage backend failed.
    Storage,
    /// The codec failed to convert otherwise valid input.
    Conversion,
}

/// Unified error type for fragment operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input validation failed.
    #[error("validation failed: {reason}")]
    Validation {
        reason: String,
        /// Whether the failure was caused by an unsupported content type.
        unsupported_type: bool,
    },

    /// Fragment metadata is missing.
    #[error("fragment '{id}' not found for owner '{owner_id}'")]
    NotFound { owner_id: OwnerId, id: FragmentId },

    /// Declared type differs from the stored one.
    #[error("a fragment's type can not be changed after it is created (stored '{stored}', got '{declared}')")]
    TypeImmutable { stored: String, declared: String },

    /// Target type is not in the fragment's conversion formats.
    #[error("conversion from '{source_type}' to '{target}' is not supported")]
    UnsupportedConversion {
        source_type: MediaType,
        target: String,
    },

    /// Storage backend failure.
    #[error("storage operation '{operation}' failed: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: BoxedError,
    },

    /// Codec failure while converting data.
    #[error("conversion from '{source_type}' to '{target}' failed: {source}")]
    Conversion {
        source_type: MediaType,
        target: MediaType,
        #[source]
        source: BoxedError,
    },
}

impl Error {
    /// Creates a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
            unsupported_type: false,
        }
    }

    /// Creates a validation error for a content type outside the registry.
    pub fn unsupported_type(value: impl AsRef<str>) -> Self {
        Self::Validation {
            reason: format!("unsupported content type '{}'", value.as_ref()),
            unsupported_type: true,
        }
    }

    /// Creates a not found error.
    pub fn not_found(owner_id: &OwnerId, id: &FragmentId) -> Self {
        Self::NotFound {
            owner_id: owner_id.clone(),
            id: id.clone(),
        }
    }

    /// Creates a type immutability error.
    pub fn type_immutable(stored: impl Into<String>, declared: impl Into<String>) -> Self {
        Self::TypeImmutable {
            stored: stored.into(),
            declared: declared.into(),
        }
    }

    /// Creates an unsupported conversion error.
    pub fn unsupported_conversion(source_type: MediaType, target: impl Into<String>) -> Self {
        Self::UnsupportedConversion {
            source_type,
            target: target.into(),
        }
    }

    /// Creates a storage error wrapping a backend failure.
    pub fn storage(
        operation: &'static str,
        source: impl Into<BoxedError>,
    ) -> Self {
        Self::Storage {
            operation,
            source: source.into(),
        }
    }

    /// Creates a conversion error wrapping a codec failure.
    pub fn conversion(
        source_type: MediaType,
        target: MediaType,
        source: impl Into<BoxedError>,
    ) -> Self {
        Self::Conversion {
            source_type,
            target,
            source: source.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::TypeImmutable { .. } => ErrorKind::TypeImmutable,
            Self::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Conversion { .. } => ErrorKind::Conversion,
        }
    }

    /// Returns true if the error was caused by an unsupported content type.
    pub fn is_unsupported_type(&self) -> bool {
        matches!(
            self,
            Self::Validation {
                unsupported_type: true,
                ..
            }
        )
    }
}
