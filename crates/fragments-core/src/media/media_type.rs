//! Closed set of supported base media types.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Media type used when a requested extension is not recognized.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A base media type (`type/subtype`, no parameters) a fragment may hold.
///
/// The string form of every variant is its essence, e.g. `text/plain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
pub enum MediaType {
    #[strum(serialize = "text/plain")]
    #[serde(rename = "text/plain")]
    TextPlain,
    #[strum(serialize = "text/markdown")]
    #[serde(rename = "text/markdown")]
    TextMarkdown,
    #[strum(serialize = "text/html")]
    #[serde(rename = "text/html")]
    TextHtml,
    #[strum(serialize = "text/csv")]
    #[serde(rename = "text/csv")]
    TextCsv,
    #[strum(serialize = "application/json")]
    #[serde(rename = "application/json")]
    ApplicationJson,
    #[strum(serialize = "application/yaml")]
    #[serde(rename = "application/yaml")]
    ApplicationYaml,
    #[strum(serialize = "image/png")]
    #[serde(rename = "image/png")]
    ImagePng,
    #[strum(serialize = "image/jpeg")]
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
    #[strum(serialize = "image/webp")]
    #[serde(rename = "image/webp")]
    ImageWebp,
    #[strum(serialize = "image/avif")]
    #[serde(rename = "image/avif")]
    ImageAvif,
    #[strum(serialize = "image/gif")]
    #[serde(rename = "image/gif")]
    ImageGif,
}

impl MediaType {
    /// Returns the `type/subtype` essence.
    #[inline]
    pub fn essence(self) -> &'static str {
        self.into()
    }

    /// Returns the canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::TextPlain => "txt",
            Self::TextMarkdown => "md",
            Self::TextHtml => "html",
            Self::TextCsv => "csv",
            Self::ApplicationJson => "json",
            Self::ApplicationYaml => "yaml",
            Self::ImagePng => "png",
            Self::ImageJpeg => "jpg",
            Self::ImageWebp => "webp",
            Self::ImageAvif => "avif",
            Self::ImageGif => "gif",
        }
    }

    /// Maps a file extension to its media type.
    ///
    /// Matching is case-insensitive. Returns `None` for extensions outside
    /// the table, which callers treat as `application/octet-stream`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let media_type = match extension.to_ascii_lowercase().as_str() {
            "txt" => Self::TextPlain,
            "md" => Self::TextMarkdown,
            "html" => Self::TextHtml,
            "csv" => Self::TextCsv,
            "json" => Self::ApplicationJson,
            "yaml" | "yml" => Self::ApplicationYaml,
            "png" => Self::ImagePng,
            "jpg" | "jpeg" => Self::ImageJpeg,
            "webp" => Self::ImageWebp,
            "avif" => Self::ImageAvif,
            "gif" => Self::ImageGif,
            _ => return None,
        };

        Some(media_type)
    }

    /// Returns true for `text/*` types.
    #[must_use]
    pub fn is_text(self) -> bool {
        self.essence().starts_with("text/")
    }

    /// Returns true for `image/*` types.
    #[must_use]
    pub fn is_image(self) -> bool {
        matches!(
            self,
            Self::ImagePng | Self::ImageJpeg | Self::ImageWebp | Self::ImageAvif | Self::ImageGif
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn essence_round_trips_through_from_str() {
        for media_type in MediaType::iter() {
            assert_eq!(MediaType::from_str(media_type.essence()).unwrap(), media_type);
        }
    }

    #[test]
    fn canonical_extension_maps_back() {
        for media_type in MediaType::iter() {
            assert_eq!(
                MediaType::from_extension(media_type.extension()),
                Some(media_type)
            );
        }
    }

    #[test]
    fn extension_aliases() {
        assert_eq!(MediaType::from_extension("yml"), Some(MediaType::ApplicationYaml));
        assert_eq!(MediaType::from_extension("JPEG"), Some(MediaType::ImageJpeg));
        assert_eq!(MediaType::from_extension("exe"), None);
        assert_eq!(MediaType::from_extension(""), None);
    }

    #[test]
    fn predicates() {
        assert!(MediaType::TextCsv.is_text());
        assert!(!MediaType::ApplicationJson.is_text());
        assert!(MediaType::ImageAvif.is_image());
        assert!(!MediaType::TextHtml.is_image());
    }

    #[test]
    fn serializes_as_essence() {
        let json = serde_json::to_string(&MediaType::ApplicationYaml).unwrap();
        assert_eq!(json, "\"application/yaml\"");
    }
}
