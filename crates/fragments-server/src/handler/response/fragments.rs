//! Fragment response types.

use fragments_core::fragment::{Fragment, FragmentMetadata};
use fragments_core::media::MediaType;
use fragments_core::storage::FragmentList;
use serde::Serialize;

/// Fragment metadata as returned by the API.
#[must_use]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentInfo {
    #[serde(flatten)]
    pub metadata: FragmentMetadata,
    /// Types the fragment can be read as; omitted on creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<MediaType>>,
}

impl FragmentInfo {
    /// Creates the response for a newly created fragment.
    pub fn created(fragment: Fragment) -> Self {
        Self {
            metadata: fragment.into_metadata(),
            formats: None,
        }
    }

    /// Creates the response with the fragment's conversion targets.
    pub fn with_formats(fragment: Fragment) -> Self {
        let formats = fragment.formats();
        Self {
            metadata: fragment.into_metadata(),
            formats: Some(formats),
        }
    }
}

/// Body of single fragment responses.
#[must_use]
#[derive(Debug, Serialize)]
pub struct FragmentBody {
    pub fragment: FragmentInfo,
}

/// Body of fragment listing responses.
#[must_use]
#[derive(Debug, Serialize)]
pub struct FragmentsBody {
    /// Identifiers, or full records when expanded.
    pub fragments: FragmentList,
}
