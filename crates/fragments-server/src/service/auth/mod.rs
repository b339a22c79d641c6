//! Authentication services.

mod authenticator;

pub use authenticator::{Authenticator, owner_id_for};

#[cfg(test)]
pub(crate) use authenticator::tests::hash as hash_password;
