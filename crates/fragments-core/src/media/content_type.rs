//! Parsed `Content-Type` values.

use std::fmt;
use std::str::FromStr;

use mime::Mime;

use super::MediaType;
use crate::{Error, Result};

/// A content-type string parsed into a supported base type and parameters.
///
/// The original string is preserved so it can be stored verbatim; only the
/// base type participates in support and conversion decisions.
#[derive(Debug, Clone)]
pub struct ContentType {
    raw: String,
    mime: Mime,
    media_type: MediaType,
}

impl ContentType {
    /// Parses a content-type string.
    ///
    /// Fails with a validation error when the value is malformed or its base
    /// type is not one of the supported [`MediaType`]s.
    pub fn parse(value: &str) -> Result<Self> {
        let mime = Mime::from_str(value.trim())
            .map_err(|_| Error::unsupported_type(value))?;
        let media_type = MediaType::from_str(mime.essence_str())
            .map_err(|_| Error::unsupported_type(value))?;

        Ok(Self {
            raw: value.trim().to_owned(),
            mime,
            media_type,
        })
    }

    /// Returns the base media type.
    #[inline]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Returns the original content-type string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the value of a parameter such as `charset`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.mime.get_param(name).map(|value| value.as_str())
    }
}

impl PartialEq for ContentType {
    /// Compares base type and parameters, ignoring case and whitespace.
    fn eq(&self, other: &Self) -> bool {
        self.mime == other.mime
    }
}

impl Eq for ContentType {}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<MediaType> for ContentType {
    fn from(media_type: MediaType) -> Self {
        Self {
            raw: media_type.essence().to_owned(),
            mime: Mime::from_str(media_type.essence()).unwrap_or(mime::APPLICATION_OCTET_STREAM),
            media_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parameters() {
        let content_type = ContentType::parse("text/plain; charset=utf-8").unwrap();
        assert_eq!(content_type.media_type(), MediaType::TextPlain);
        assert_eq!(content_type.param("charset"), Some("utf-8"));
        assert_eq!(content_type.as_str(), "text/plain; charset=utf-8");
    }

    #[test]
    fn rejects_unsupported_and_malformed() {
        assert!(ContentType::parse("audio/mpeg").unwrap_err().is_unsupported_type());
        assert!(ContentType::parse("not a type").unwrap_err().is_unsupported_type());
        assert!(ContentType::parse("").is_err());
    }

    #[test]
    fn equality_ignores_case() {
        let lower = ContentType::parse("text/plain; charset=utf-8").unwrap();
        let upper = ContentType::parse("Text/Plain; charset=utf-8").unwrap();
        assert_eq!(lower, upper);

        let other = ContentType::parse("text/markdown").unwrap();
        assert_ne!(lower, other);
    }

    #[test]
    fn from_media_type() {
        let content_type = ContentType::from(MediaType::ImagePng);
        assert_eq!(content_type.as_str(), "image/png");
        assert_eq!(content_type, ContentType::parse("image/png").unwrap());
    }
}
