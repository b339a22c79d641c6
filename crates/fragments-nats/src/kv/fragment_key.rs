//! Storage keys for fragments.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use fragments_core::fragment::{FragmentId, OwnerId};

use crate::Error;

/// Key addressing one fragment in both buckets: `{owner}.{id}`.
///
/// Both segments are URL-safe base64 without padding, so any opaque owner or
/// fragment id yields a valid NATS key and `.` only ever separates segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentKey {
    pub owner_id: OwnerId,
    pub id: FragmentId,
}

impl FragmentKey {
    /// Creates a key for the given owner and fragment.
    pub fn new(owner_id: &OwnerId, id: &FragmentId) -> Self {
        Self {
            owner_id: owner_id.clone(),
            id: id.clone(),
        }
    }

    /// Returns the prefix shared by all keys of `owner_id`, separator included.
    pub fn owner_prefix(owner_id: &OwnerId) -> String {
        format!("{}.", URL_SAFE_NO_PAD.encode(owner_id.as_str()))
    }
}

impl fmt::Display for FragmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            URL_SAFE_NO_PAD.encode(self.owner_id.as_str()),
            URL_SAFE_NO_PAD.encode(self.id.as_str())
        )
    }
}

impl FromStr for FragmentKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, id) = s
            .split_once('.')
            .ok_or_else(|| Error::invalid_key(s, "missing separator"))?;

        let decode = |segment: &str| {
            URL_SAFE_NO_PAD
                .decode(segment)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .ok_or_else(|| Error::invalid_key(s, "segment is not base64 encoded utf-8"))
        };

        Ok(Self {
            owner_id: OwnerId::new(decode(owner)?),
            id: FragmentId::new(decode(id)?),
        })
    }
}
