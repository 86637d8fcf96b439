//! Password hashing.
//!
//! The user service only ever stores digests produced here and never sees plaintext again
//! after creation.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::{RecordError, RecordResult};

/// Hashes and verifies passwords. Implementations must be safe to share across request threads.
pub trait PasswordHashing: Send + Sync {
    /// Produces a self-describing digest of `plaintext`.
    fn hash(&self, plaintext: &str) -> RecordResult<String>;

    /// Returns `Ok(true)` when `plaintext` matches `digest` and `Ok(false)` on a mismatch.
    /// A malformed digest is an internal failure, not a mismatch.
    fn verify(&self, digest: &str, plaintext: &str) -> RecordResult<bool>;
}

/// Argon2id with the crate's default parameters, stored as PHC strings.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHashing for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> RecordResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| RecordError::Internal(format!("failed to hash password: {e}")))?;
        Ok(digest.to_string())
    }

    fn verify(&self, digest: &str, plaintext: &str) -> RecordResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| RecordError::Internal(format!("stored password digest is malformed: {e}")))?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(RecordError::Internal(format!(
                "failed to verify password: {e}"
            ))),
        }
    }
}
