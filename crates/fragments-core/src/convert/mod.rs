//! Conversion engine.
//!
//! Every supported `(source, target)` pair maps to exactly one
//! [`Conversion`] through [`Conversion::plan`]. The [`TypeRegistry`] derives
//! its conversion formats from the same function, so a pair the registry does
//! not offer can never reach a transform, and a pair without a transform can
//! never be offered.

mod data;
mod raster;
mod text;

use std::sync::Arc;

use bytes::Bytes;

pub use self::text::TEXT_WRAP_WIDTH;
use crate::error::BoxedError;
use crate::media::{MediaType, OCTET_STREAM};
use crate::registry::TypeRegistry;
use crate::{Error, Result, TRACING_TARGET_CONVERT};

/// A single transform between two media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Source and target are the same type.
    Identity,
    /// Render markdown as HTML.
    MarkdownToHtml,
    /// Render markdown and strip the markup.
    MarkdownToText,
    /// Strip HTML markup.
    HtmlToText,
    /// Project CSV rows into a JSON array of objects.
    CsvToJson,
    /// Re-encode JSON as YAML.
    JsonToYaml,
    /// Serve a textual structured format as plain text, bytes unchanged.
    AsPlainText,
    /// Decode and re-encode a raster image.
    ImageTranscode,
}

impl Conversion {
    /// Returns the transform from `source` to `target`, if one exists.
    pub fn plan(source: MediaType, target: MediaType) -> Option<Self> {
        use MediaType as M;

        if source == target {
            return Some(Self::Identity);
        }

        let conversion = match (source, target) {
            (M::TextMarkdown, M::TextHtml) => Self::MarkdownToHtml,
            (M::TextMarkdown, M::TextPlain) => Self::MarkdownToText,
            (M::TextHtml, M::TextPlain) => Self::HtmlToText,
            (M::TextCsv, M::ApplicationJson) => Self::CsvToJson,
            (M::ApplicationJson, M::ApplicationYaml) => Self::JsonToYaml,
            (M::TextCsv | M::ApplicationJson | M::ApplicationYaml, M::TextPlain) => {
                Self::AsPlainText
            }
            // The codec build can encode AVIF but not decode it.
            (M::ImageAvif, _) => return None,
            (source, target) if source.is_image() && target.is_image() => Self::ImageTranscode,
            _ => return None,
        };

        Some(conversion)
    }

    /// Applies the transform to `input`.
    ///
    /// Malformed input surfaces as [`Error::Conversion`].
    pub fn apply(self, input: &Bytes, source: MediaType, target: MediaType) -> Result<Bytes> {
        let fail = |err: BoxedError| Error::conversion(source, target, err);

        let output = match self {
            Self::Identity | Self::AsPlainText => return Ok(input.clone()),
            Self::MarkdownToHtml => text::markdown_to_html(as_utf8(input).map_err(fail)?).into_bytes(),
            Self::MarkdownToText => text::markdown_to_text(as_utf8(input).map_err(fail)?)
                .map_err(|err| fail(err.into()))?
                .into_bytes(),
            Self::HtmlToText => text::html_to_text(input)
                .map_err(|err| fail(err.into()))?
                .into_bytes(),
            Self::CsvToJson => data::csv_to_json(input).map_err(fail)?,
            Self::JsonToYaml => data::json_to_yaml(input).map_err(fail)?,
            Self::ImageTranscode => {
                let format = raster::image_format(target)
                    .ok_or_else(|| fail("target is not a raster image type".into()))?;
                raster::transcode(input, format).map_err(fail)?
            }
        };

        Ok(Bytes::from(output))
    }

    /// Returns true if the transform is CPU heavy enough to run off the
    /// async executor.
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::ImageTranscode)
    }
}

fn as_utf8(input: &[u8]) -> Result<&str, BoxedError> {
    Ok(std::str::from_utf8(input)?)
}

/// Negotiates and runs conversions against a shared [`TypeRegistry`].
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    registry: Arc<TypeRegistry>,
}

impl ConversionEngine {
    /// Creates an engine bound to the given registry.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry the engine negotiates against.
    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Resolves `extension` to a target type offered for `source`.
    ///
    /// Unknown extensions resolve to `application/octet-stream`, which no
    /// type offers, so they fail the same way as any other unoffered target.
    pub fn negotiate(&self, source: MediaType, extension: &str) -> Result<(MediaType, Conversion)> {
        let Some(target) = MediaType::from_extension(extension) else {
            return Err(Error::unsupported_conversion(source, OCTET_STREAM));
        };

        if !self.registry.allows(source, target) {
            return Err(Error::unsupported_conversion(source, target.essence()));
        }

        let conversion = Conversion::plan(source, target)
            .ok_or_else(|| Error::unsupported_conversion(source, target.essence()))?;

        Ok((target, conversion))
    }

    /// Converts `data` from `source` into the type named by `extension`.
    pub async fn convert(
        &self,
        data: Bytes,
        source: MediaType,
        extension: &str,
    ) -> Result<(Bytes, MediaType)> {
        let (target, conversion) = self.negotiate(source, extension).inspect_err(|err| {
            tracing::debug!(
                target: TRACING_TARGET_CONVERT,
                source = %source,
                extension = %extension,
                error = %err,
                "Conversion rejected"
            );
        })?;

        let output = if conversion.is_blocking() {
            tokio::task::spawn_blocking(move || conversion.apply(&data, source, target))
                .await
                .map_err(|err| Error::conversion(source, target, err))??
        } else {
            conversion.apply(&data, source, target)?
        };

        tracing::debug!(
            target: TRACING_TARGET_CONVERT,
            source = %source,
            target_type = %target,
            ?conversion,
            size = output.len(),
            "Converted fragment data"
        );

        Ok((output, target))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::ErrorKind;

    fn engine() -> ConversionEngine {
        ConversionEngine::new(Arc::new(TypeRegistry::default()))
    }

    #[test]
    fn identity_for_every_type() {
        for media_type in MediaType::iter() {
            assert_eq!(
                Conversion::plan(media_type, media_type),
                Some(Conversion::Identity)
            );
        }
    }

    #[test]
    fn no_path_between_text_and_images() {
        assert_eq!(Conversion::plan(MediaType::TextPlain, MediaType::ImagePng), None);
        assert_eq!(Conversion::plan(MediaType::ImagePng, MediaType::TextPlain), None);
        assert_eq!(Conversion::plan(MediaType::TextPlain, MediaType::TextHtml), None);
        assert_eq!(Conversion::plan(MediaType::ApplicationYaml, MediaType::ApplicationJson), None);
    }

    #[tokio::test]
    async fn markdown_to_html() {
        let (output, target) = engine()
            .convert(Bytes::from_static(b"## Title"), MediaType::TextMarkdown, "html")
            .await
            .unwrap();

        assert_eq!(target, MediaType::TextHtml);
        assert!(std::str::from_utf8(&output).unwrap().contains("<h2>Title</h2>"));
    }

    #[tokio::test]
    async fn json_to_yaml() {
        let (output, target) = engine()
            .convert(Bytes::from_static(br#"{"a":1}"#), MediaType::ApplicationJson, "yaml")
            .await
            .unwrap();

        assert_eq!(target, MediaType::ApplicationYaml);
        assert!(std::str::from_utf8(&output).unwrap().contains("a: 1"));
    }

    #[tokio::test]
    async fn self_conversion_is_identity_for_text() {
        for media_type in MediaType::iter().filter(|media_type| media_type.is_text()) {
            let input = Bytes::from_static(b"plain,bytes\n1,2\n");
            let (output, target) = engine()
                .convert(input.clone(), media_type, media_type.extension())
                .await
                .unwrap();

            assert_eq!(target, media_type);
            assert_eq!(output, input);
        }
    }

    #[tokio::test]
    async fn unoffered_target_is_unsupported() {
        let err = engine()
            .convert(Bytes::from_static(b"hello"), MediaType::TextPlain, "html")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
    }

    #[tokio::test]
    async fn unknown_extension_is_unsupported() {
        let err = engine()
            .convert(Bytes::from_static(b"hello"), MediaType::TextPlain, "exe")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
        assert!(err.to_string().contains(OCTET_STREAM));
    }

    #[tokio::test]
    async fn malformed_source_is_conversion_failure() {
        let err = engine()
            .convert(Bytes::from_static(b"{oops"), MediaType::ApplicationJson, "yml")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);

        let err = engine()
            .convert(Bytes::from_static(b"not a png"), MediaType::ImagePng, "gif")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    fn sample_png() -> Bytes {
        use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

        let image = RgbaImage::from_pixel(8, 8, Rgba([10, 120, 200, 255]));
        let mut output = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut output, ImageFormat::Png)
            .unwrap();
        Bytes::from(output.into_inner())
    }

    #[tokio::test]
    async fn avif_is_a_target_only() {
        let engine = engine();
        let (avif, target) = engine
            .convert(sample_png(), MediaType::ImagePng, "avif")
            .await
            .unwrap();
        assert_eq!(target, MediaType::ImageAvif);
        assert!(!avif.is_empty());

        let (same, target) = engine
            .convert(avif.clone(), MediaType::ImageAvif, "avif")
            .await
            .unwrap();
        assert_eq!(target, MediaType::ImageAvif);
        assert_eq!(same, avif);

        for extension in ["png", "jpg", "webp", "gif"] {
            let err = engine
                .convert(avif.clone(), MediaType::ImageAvif, extension)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
        }
    }

    #[tokio::test]
    async fn disabled_target_is_unsupported() {
        let registry = TypeRegistry::new([MediaType::TextMarkdown, MediaType::TextPlain]);
        let engine = ConversionEngine::new(Arc::new(registry));

        let err = engine
            .convert(Bytes::from_static(b"# x"), MediaType::TextMarkdown, "html")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);

        let (_, target) = engine
            .convert(Bytes::from_static(b"# x"), MediaType::TextMarkdown, "txt")
            .await
            .unwrap();
        assert_eq!(target, MediaType::TextPlain);
    }
}
