//! Fragment entity, identifiers and collection operations.

mod entity;
mod fragment_id;
mod fragment_metadata;
mod repository;

pub use self::entity::Fragment;
pub use self::fragment_id::{FragmentId, OwnerId};
pub use self::fragment_metadata::FragmentMetadata;
pub use self::repository::FragmentRepository;
