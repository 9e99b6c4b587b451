//! Mock authentication service.
//!
//! Sessions are real; the user database is not. Self-registered users live
//! in the local roster store, and one admin account is seeded from
//! configuration at startup. Passwords are hashed with argon2 at rest.

use std::sync::{Arc, Mutex};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use wheels_core::{CustomerId, Role};

use crate::models::CurrentUser;

use super::store::{KeyValueStore, StoreError, StoredUser, UserStore};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username or password. Deliberately does not say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The username is already registered (or collides with the admin seed).
    #[error("username already taken")]
    UsernameTaken,

    /// Roster storage failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing or verification failed internally.
    #[error("password hashing error")]
    PasswordHash,
}

/// Authentication service over the local roster.
#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    admin: StoredUser,
    // Serializes load-modify-save cycles on the roster (single process,
    // single store; no finer granularity needed)
    write_lock: Arc<Mutex<()>>,
}

impl AuthService {
    /// Create the service, hashing the seeded admin password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PasswordHash`] if the seed cannot be hashed.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        admin_username: &str,
        admin_password: &str,
    ) -> Result<Self, AuthError> {
        let admin = StoredUser {
            username: admin_username.to_string(),
            password_hash: hash_password(admin_password)?,
            role: Role::Admin,
            customer_id: None,
        };

        Ok(Self {
            users: UserStore::new(store, admin_username),
            admin,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Authenticate a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on any mismatch - a wrong
    /// username and a wrong password are indistinguishable to the caller.
    pub fn login(&self, username: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let record = self
            .find(username)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &record.password_hash)?;

        Ok(CurrentUser {
            username: record.username,
            role: record.role,
            customer_id: record.customer_id,
        })
    }

    /// Register a new user, linking it to its remote customer profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the username exists (the
    /// roster is not mutated in that case).
    pub fn register(
        &self,
        username: &str,
        password: &str,
        customer_id: Option<CustomerId>,
    ) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        if self.find(username)?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let mut roster = self.users.load()?;
        roster.push(StoredUser {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: Role::User,
            customer_id,
        });
        self.users.save(&roster)?;

        tracing::info!(username, "user registered");
        Ok(())
    }

    /// Look up a roster record by username, the admin seed included.
    fn find(&self, username: &str) -> Result<Option<StoredUser>, AuthError> {
        if username == self.admin.username {
            return Ok(Some(self.admin.clone()));
        }
        Ok(self
            .users
            .load()?
            .into_iter()
            .find(|u| u.username == username))
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("admin_username", &self.admin.username)
            .finish_non_exhaustive()
    }
}

/// Hash a password with argon2id and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
///
/// A malformed stored hash is an internal error; a mismatch is
/// `InvalidCredentials`.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}
