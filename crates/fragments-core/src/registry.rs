//! Registry of supported content types and their conversion formats.

use std::collections::BTreeSet;

use strum::IntoEnumIterator;

use crate::convert::Conversion;
use crate::media::{ContentType, MediaType};
use crate::{Error, Result};

/// The set of media types fragments may be created with.
///
/// Built once at startup and shared behind an `Arc`. Conversion formats are
/// restricted to types that are themselves enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    supported: BTreeSet<MediaType>,
}

impl TypeRegistry {
    /// Creates a registry enabling only the given types.
    pub fn new(types: impl IntoIterator<Item = MediaType>) -> Self {
        Self {
            supported: types.into_iter().collect(),
        }
    }

    /// Returns the enabled types in a stable order.
    pub fn supported_types(&self) -> impl Iterator<Item = MediaType> + '_ {
        self.supported.iter().copied()
    }

    /// Returns true if fragments may be created with `media_type`.
    #[inline]
    pub fn is_supported(&self, media_type: MediaType) -> bool {
        self.supported.contains(&media_type)
    }

    /// Returns true if `value` parses as a content type with an enabled base
    /// type. Never fails.
    pub fn is_supported_type(&self, value: &str) -> bool {
        self.parse(value).is_ok()
    }

    /// Parses `value` and checks its base type is enabled.
    pub fn parse(&self, value: &str) -> Result<ContentType> {
        let content_type = ContentType::parse(value)?;
        if !self.is_supported(content_type.media_type()) {
            return Err(Error::unsupported_type(value));
        }

        Ok(content_type)
    }

    /// Returns the types `source` may be converted into, itself first.
    ///
    /// Empty when `source` is not enabled.
    pub fn formats(&self, source: MediaType) -> Vec<MediaType> {
        if !self.is_supported(source) {
            return Vec::new();
        }

        std::iter::once(source)
            .chain(MediaType::iter().filter(|&target| {
                target != source
                    && self.is_supported(target)
                    && Conversion::plan(source, target).is_some()
            }))
            .collect()
    }

    /// Returns true if `source` may be converted into `target`.
    pub fn allows(&self, source: MediaType, target: MediaType) -> bool {
        self.is_supported(source)
            && self.is_supported(target)
            && Conversion::plan(source, target).is_some()
    }
}

impl Default for TypeRegistry {
    /// Enables every known media type.
    fn default() -> Self {
        Self::new(MediaType::iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_type_checks() {
        let registry = TypeRegistry::default();

        assert!(registry.is_supported_type("text/plain"));
        assert!(registry.is_supported_type("text/plain; charset=utf-8"));
        assert!(registry.is_supported_type("image/avif"));
        assert!(!registry.is_supported_type("audio/mpeg"));
        assert!(!registry.is_supported_type("text"));
        assert!(!registry.is_supported_type(""));
    }

    #[test]
    fn formats_table() {
        let registry = TypeRegistry::default();
        use MediaType as M;

        assert_eq!(registry.formats(M::TextPlain), vec![M::TextPlain]);
        assert_eq!(
            registry.formats(M::TextMarkdown),
            vec![M::TextMarkdown, M::TextPlain, M::TextHtml]
        );
        assert_eq!(registry.formats(M::TextHtml), vec![M::TextHtml, M::TextPlain]);
        assert_eq!(
            registry.formats(M::TextCsv),
            vec![M::TextCsv, M::TextPlain, M::ApplicationJson]
        );
        assert_eq!(
            registry.formats(M::ApplicationJson),
            vec![M::ApplicationJson, M::TextPlain, M::ApplicationYaml]
        );
        assert_eq!(
            registry.formats(M::ApplicationYaml),
            vec![M::ApplicationYaml, M::TextPlain]
        );
        assert_eq!(
            registry.formats(M::ImageGif),
            vec![M::ImageGif, M::ImagePng, M::ImageJpeg, M::ImageWebp, M::ImageAvif]
        );
        assert_eq!(registry.formats(M::ImageAvif), vec![M::ImageAvif]);
    }

    #[test]
    fn formats_include_self() {
        let registry = TypeRegistry::default();
        for media_type in registry.supported_types() {
            assert_eq!(registry.formats(media_type).first(), Some(&media_type));
        }
    }

    #[test]
    fn restricted_registry() {
        let registry = TypeRegistry::new([MediaType::TextPlain, MediaType::TextMarkdown]);

        assert!(!registry.is_supported_type("text/html"));
        assert!(registry.formats(MediaType::TextHtml).is_empty());
        assert_eq!(
            registry.formats(MediaType::TextMarkdown),
            vec![MediaType::TextMarkdown, MediaType::TextPlain]
        );
        assert!(!registry.allows(MediaType::TextMarkdown, MediaType::TextHtml));
    }
}
