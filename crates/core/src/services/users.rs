//! User accounts.
//!
//! Passwords are hashed before the store lock is taken, so a slow hash never blocks readers.
//! The uniqueness check and the insert still share one write lock, which leaves exactly one
//! winner when two requests race for the same username.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::constants::{PASSWORD_MIN_LEN, USERNAME_MIN_LEN};
use crate::error::{RecordError, RecordResult};
use crate::integrity;
use crate::models::User;
use crate::password::PasswordHashing;
use crate::store::EntityStore;
use crate::validation::required_text;

#[derive(Clone)]
pub struct UserService {
    store: EntityStore,
    hasher: Arc<dyn PasswordHashing>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(store: EntityStore, hasher: Arc<dyn PasswordHashing>) -> Self {
        Self { store, hasher }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the username or password is too short.
    /// - `AlreadyExists` if the username is taken.
    /// - `Internal` if hashing fails.
    #[instrument(skip(self, password))]
    pub fn create_user(&self, username: &str, password: &str) -> RecordResult<()> {
        let username = required_text("username", username, USERNAME_MIN_LEN)?.into_inner();
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(RecordError::InvalidInput(format!(
                "password must be at least {PASSWORD_MIN_LEN} characters"
            )));
        }

        // Cheap early exit; the write section below is authoritative.
        self.store
            .with_read(|records| integrity::validate_unique_username(records, &username))?;

        let password_hash = self.hasher.hash(password)?;
        debug!("password hashed");

        self.store.with_write(|records| -> RecordResult<()> {
            integrity::validate_unique_username(records, &username)?;
            records.insert_user(User {
                username: username.clone(),
                password_hash,
            });
            Ok(())
        })?;

        info!("user created");
        Ok(())
    }

    /// Returns the stored digest for `username`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput("invalid username")` when no such user exists.
    pub fn get_password_by_username(&self, username: &str) -> RecordResult<String> {
        // stored usernames are trimmed on create
        let username = username.trim();
        self.store.with_read(|records| {
            records
                .user(username)
                .map(|user| user.password_hash.clone())
                .map_err(|_| RecordError::InvalidInput("invalid username".into()))
        })
    }

    /// Checks a username and password pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown user or a wrong password.
    #[instrument(skip(self, password))]
    pub fn verify_credentials(&self, username: &str, password: &str) -> RecordResult<()> {
        let digest = self.get_password_by_username(username)?;
        if !self.hasher.verify(&digest, password)? {
            warn!("password mismatch");
            return Err(RecordError::InvalidInput("password does not match".into()));
        }
        Ok(())
    }
}
