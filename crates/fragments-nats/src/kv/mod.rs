//! Key-value storage for fragment metadata.

mod fragment_key;
mod metadata_store;

pub use fragment_key::FragmentKey;
pub use metadata_store::MetadataStore;
