//! HTTP Basic credential verification against an htpasswd-style file.
//!
//! Each non-empty line of the credentials file holds `email:argon2-phc-hash`;
//! lines starting with `#` are comments. Hashes carry their own Argon2
//! parameters, so files produced by any Argon2 tool are accepted.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use fragments_core::fragment::OwnerId;
use sha2::{Digest, Sha256};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{ErrorKind, Result};
use crate::service::{Result as ServiceResult, ServiceError};

/// Salt of the hash verified for unknown users.
const DUMMY_SALT: &str = "ZnJhZ21lbnRzLWR1bW15";

/// Returns the owner id for an authenticated email: lowercase hex SHA-256.
pub fn owner_id_for(email: &str) -> OwnerId {
    OwnerId::new(hex::encode(Sha256::digest(email.as_bytes())))
}

/// Verifies Basic credentials and maps users to owner ids.
///
/// Cheaply cloneable; the credential table is shared.
#[derive(Clone)]
pub struct Authenticator {
    inner: Arc<AuthenticatorInner>,
}

struct AuthenticatorInner {
    argon2: Argon2<'static>,
    credentials: HashMap<String, String>,
    dummy_hash: String,
}

impl Authenticator {
    /// Creates an authenticator from `(email, phc_hash)` pairs.
    ///
    /// Fails if any hash is not a valid PHC string.
    pub fn new<I, E, H>(credentials: I) -> ServiceResult<Self>
    where
        I: IntoIterator<Item = (E, H)>,
        E: Into<String>,
        H: Into<String>,
    {
        let argon2 = Argon2::default();
        let mut table = HashMap::new();
        for (email, hash) in credentials {
            let email = email.into();
            let hash = hash.into();
            PasswordHash::new(&hash).map_err(|e| {
                ServiceError::auth(format!("invalid password hash for '{email}': {e}"))
            })?;
            table.insert(email, hash);
        }

        let salt = SaltString::from_b64(DUMMY_SALT)
            .map_err(|e| ServiceError::auth(format!("invalid dummy salt: {e}")))?;
        let dummy_hash = argon2
            .hash_password(b"", &salt)
            .map_err(|e| ServiceError::auth(format!("failed to prepare dummy hash: {e}")))?
            .to_string();

        Ok(Self {
            inner: Arc::new(AuthenticatorInner {
                argon2,
                credentials: table,
                dummy_hash,
            }),
        })
    }

    /// Parses credentials file content.
    pub fn parse(content: &str) -> ServiceResult<Self> {
        let mut credentials = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((email, hash)) = line.split_once(':') else {
                return Err(ServiceError::auth(format!(
                    "line {}: expected 'email:hash'",
                    index + 1
                )));
            };
            if email.is_empty() {
                return Err(ServiceError::auth(format!("line {}: empty user", index + 1)));
            }
            credentials.push((email.to_owned(), hash.to_owned()));
        }

        Self::new(credentials)
    }

    /// Loads the credentials file at `path`.
    pub async fn from_file(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ServiceError::auth_with_source(
                format!("failed to read credentials file '{}'", path.display()),
                e,
            )
        })?;

        let authenticator = Self::parse(&content)?;
        tracing::info!(
            target: TRACING_TARGET_AUTHENTICATION,
            path = %path.display(),
            users = authenticator.len(),
            "Loaded credentials"
        );
        Ok(authenticator)
    }

    /// Returns the number of known users.
    pub fn len(&self) -> usize {
        self.inner.credentials.len()
    }

    /// Returns true if no users are configured.
    pub fn is_empty(&self) -> bool {
        self.inner.credentials.is_empty()
    }

    /// Verifies a user's password and returns their owner id.
    ///
    /// Unknown users cost one hash verification as well, so response time
    /// does not reveal which users exist.
    pub fn verify(&self, email: &str, password: &str) -> Result<OwnerId> {
        let Some(stored) = self.inner.credentials.get(email) else {
            let _ = self.check(password, &self.inner.dummy_hash);
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                "Unknown user"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("invalid credentials")
                .with_resource("authentication"));
        };

        match self.check(password, stored) {
            Ok(()) => Ok(owner_id_for(email)),
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    "Password verification failed"
                );
                Err(ErrorKind::Unauthorized
                    .with_message("invalid credentials")
                    .with_resource("authentication"))
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %e,
                    "Password verification system error"
                );
                Err(ErrorKind::InternalServerError
                    .with_message("authentication temporarily unavailable")
                    .with_context(e.to_string()))
            }
        }
    }

    fn check(&self, password: &str, hash: &str) -> Result<(), ArgonError> {
        let parsed = PasswordHash::new(hash)?;
        self.inner
            .argon2
            .verify_password(password.as_bytes(), &parsed)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("users", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use super::*;

    /// Hashes `password` with a fixed salt and light parameters.
    pub(crate) fn hash(password: &str) -> String {
        let salt = SaltString::from_b64("c29tZXNhbHQ").unwrap();
        let params = argon2::Params::new(1024, 1, 1, None).unwrap();
        Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[test]
    fn owner_id_is_sha256_hex() {
        let owner = owner_id_for("user1@email.com");
        assert_eq!(owner.as_str().len(), 64);
        assert!(owner.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(
            owner_id_for("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn verify_credentials() -> anyhow::Result<()> {
        let authenticator = Authenticator::new([("user1@email.com", hash("password1"))])?;

        let owner = authenticator.verify("user1@email.com", "password1")?;
        assert_eq!(owner, owner_id_for("user1@email.com"));

        let error = authenticator
            .verify("user1@email.com", "wrong")
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        let error = authenticator.verify("nobody@email.com", "password1").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() -> anyhow::Result<()> {
        let content = format!(
            "# users\n\nuser1@email.com:{}\nuser2@email.com:{}\n",
            hash("password1"),
            hash("password2")
        );
        let authenticator = Authenticator::parse(&content)?;
        assert_eq!(authenticator.len(), 2);
        assert!(authenticator.verify("user2@email.com", "password2").is_ok());
        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_lines() {
        assert!(Authenticator::parse("no-separator").is_err());
        assert!(Authenticator::parse(":hash").is_err());
        assert!(Authenticator::parse("user@email.com:not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn load_from_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "user1@email.com:{}", hash("password1"))?;

        let authenticator = Authenticator::from_file(file.path()).await?;
        assert_eq!(authenticator.len(), 1);
        assert!(!authenticator.is_empty());

        let missing = Authenticator::from_file("/nonexistent/credentials").await;
        assert!(missing.is_err());
        Ok(())
    }
}
