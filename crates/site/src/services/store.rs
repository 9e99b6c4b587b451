//! Local key-value persistence.
//!
//! The browser original kept its user roster in local storage under a single
//! key. Here that becomes a small [`KeyValueStore`] trait with a JSON-file
//! backend for production and an in-memory backend for tests; [`UserStore`]
//! layers the roster semantics on top (admin seed injected on load, never
//! written back).
//!
//! Reads and writes are synchronous: the store holds a handful of small
//! records and is only touched from auth operations.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wheels_core::{CustomerId, Role};

/// Storage key for the registered-user roster.
pub const USERS_KEY: &str = "app_users";

/// Errors from the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized.
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The in-memory lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A minimal string key-value store.
///
/// Swappable backend for anything that needs browser-local-storage-like
/// persistence.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Key-value store writing one JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write-then-rename so a crash mid-write never truncates the roster
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory key-value store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// A persisted login record.
///
/// Passwords are stored as argon2 hashes, never in the clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
}

/// Roster persistence on top of a [`KeyValueStore`].
///
/// The seeded admin record lives in configuration, not the store: it is
/// injected into every load and filtered out of every save, so the
/// persisted collection only ever holds self-registered users.
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn KeyValueStore>,
    admin_username: String,
}

impl UserStore {
    /// Create a roster store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, admin_username: impl Into<String>) -> Self {
        Self {
            store,
            admin_username: admin_username.into(),
        }
    }

    /// Load the persisted roster (admin seed not included; callers append it).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails or the stored JSON is
    /// corrupt.
    pub fn load(&self) -> Result<Vec<StoredUser>, StoreError> {
        match self.store.get(USERS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Persist the roster, excluding any record named like the admin seed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    pub fn save(&self, users: &[StoredUser]) -> Result<(), StoreError> {
        let to_store: Vec<&StoredUser> = users
            .iter()
            .filter(|u| u.username != self.admin_username)
            .collect();
        let raw = serde_json::to_string(&to_store)?;
        self.store.put(USERS_KEY, &raw)
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("admin_username", &self.admin_username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user(username: &str) -> StoredUser {
        StoredUser {
            username: username.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: Role::User,
            customer_id: Some(CustomerId::new(9)),
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_json_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("roster").unwrap(), None);
        store.put("roster", "[1,2,3]").unwrap();
        assert_eq!(store.get("roster").unwrap().as_deref(), Some("[1,2,3]"));

        // Reopening sees the same data
        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("roster").unwrap().as_deref(), Some("[1,2,3]"));

        store.remove("roster").unwrap();
        assert_eq!(store.get("roster").unwrap(), None);
        // Removing a missing key is not an error
        store.remove("roster").unwrap();
    }

    #[test]
    fn test_user_store_excludes_admin_from_persistence() {
        let kv = Arc::new(MemoryStore::new());
        let users = UserStore::new(Arc::clone(&kv) as Arc<dyn KeyValueStore>, "admin");

        let roster = vec![
            sample_user("maria"),
            StoredUser {
                username: "admin".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Admin,
                customer_id: None,
            },
        ];
        users.save(&roster).unwrap();

        let raw = kv.get(USERS_KEY).unwrap().unwrap();
        assert!(raw.contains("maria"));
        assert!(!raw.contains("admin"));

        let loaded = users.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].username, "maria");
    }

    #[test]
    fn test_user_store_empty_load() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let users = UserStore::new(kv, "admin");
        assert!(users.load().unwrap().is_empty());
    }
}
