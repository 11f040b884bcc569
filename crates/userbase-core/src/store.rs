//! Flat-file credential store
//!
//! The whole user collection persists as one pretty-printed JSON document
//! mapping username to record. Every operation re-reads the document and
//! every mutation rewrites it whole, so the file is the single source of
//! truth across processes. There is no locking: concurrent writers race and
//! the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::password::{generate_salt, hash_password};
use crate::types::{Role, Settings, UserRecord};

/// Username to record collection, in document order
pub type Users = IndexMap<String, UserRecord>;

/// Accounts seeded when no document exists yet. First-run credentials for a
/// local deployment, not hardened secrets.
const BOOTSTRAP_ACCOUNTS: [(&str, &str, Role); 2] = [
    ("admin", "talentland2025", Role::Admin),
    ("usuario", "password123", Role::User),
];

/// Flat-file credential store
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    /// Open a store backed by `path`, seeding the default accounts when the
    /// document does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };

        if let Some(parent) = store.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !store.path.exists() {
            store.bootstrap()?;
        }

        Ok(store)
    }

    /// Path to the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the seeded document with the two default accounts
    fn bootstrap(&self) -> Result<()> {
        info!("No user document at {:?}, seeding default accounts", self.path);

        let mut users = Users::new();
        for (username, password, role) in BOOTSTRAP_ACCOUNTS {
            users.insert(username.to_string(), UserRecord::new(password, role));
        }

        self.save(&users)
    }

    /// Read the whole document, reporting faults to the caller
    pub fn try_load(&self) -> Result<Users> {
        let contents = fs::read_to_string(&self.path)?;
        let users: Users = serde_json::from_str(&contents)?;

        debug!("Loaded {} users from {:?}", users.len(), self.path);
        Ok(users)
    }

    /// Read the whole document; an unreadable or corrupt document degrades to
    /// an empty collection. Callers that must distinguish the degraded state
    /// use [`UserStore::try_load`] instead.
    fn load(&self) -> Users {
        match self.try_load() {
            Ok(users) => users,
            Err(err) => {
                warn!("Failed to load users from {:?}: {}", self.path, err);
                Users::new()
            }
        }
    }

    /// Write the whole document atomically using a temp file
    fn save(&self, users: &Users) -> Result<()> {
        let contents = serde_json::to_string_pretty(users)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &contents)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Saved {} users to {:?}", users.len(), self.path);
        Ok(())
    }

    /// Register a new user. Returns `Ok(false)` when the username is already
    /// taken; the existing record is left untouched.
    pub fn register_user(&self, username: &str, password: &str, role: Role) -> Result<bool> {
        let mut users = self.load();

        if users.contains_key(username) {
            return Ok(false);
        }

        users.insert(username.to_string(), UserRecord::new(password, role));
        self.save(&users)?;

        info!("Registered user: {} ({})", username, role);
        Ok(true)
    }

    /// Check a password against the stored digest. Unknown users and records
    /// missing a hash or salt verify as false.
    pub fn verify_password(&self, username: &str, password: &str) -> bool {
        let users = self.load();

        let Some(record) = users.get(username) else {
            return false;
        };
        let (Some(stored_hash), Some(salt)) = (&record.password_hash, &record.salt) else {
            return false;
        };

        // Hex digest equality is not constant time; the store targets a
        // local single-process tool.
        hash_password(password, salt) == *stored_hash
    }

    /// Change a password after verifying the current one. A fresh salt is
    /// issued for the new password. Unknown user and wrong password both
    /// come back as `Ok(false)`.
    pub fn change_password(&self, username: &str, old_password: &str, new_password: &str) -> Result<bool> {
        if !self.verify_password(username, old_password) {
            return Ok(false);
        }

        let mut users = self.load();
        let Some(record) = users.get_mut(username) else {
            return Ok(false);
        };

        let salt = generate_salt();
        record.password_hash = Some(hash_password(new_password, &salt));
        record.salt = Some(salt);
        self.save(&users)?;

        info!("Changed password for user: {}", username);
        Ok(true)
    }

    /// Full record for `username`, hash and salt included; callers are
    /// trusted collaborators.
    pub fn get_user_data(&self, username: &str) -> Option<UserRecord> {
        let users = self.load();
        users.get(username).cloned()
    }

    /// Merge settings into a user's mapping, creating it on first write.
    /// Existing keys not named in `settings` are retained.
    pub fn save_user_settings(&self, username: &str, settings: &Settings) -> Result<bool> {
        let mut users = self.load();

        let Some(record) = users.get_mut(username) else {
            return Ok(false);
        };

        let merged = record.settings.get_or_insert_with(Settings::new);
        for (key, value) in settings {
            merged.insert(key.clone(), value.clone());
        }
        self.save(&users)?;

        debug!("Saved {} setting(s) for user: {}", settings.len(), username);
        Ok(true)
    }

    /// A user's settings mapping, or an empty mapping when the user is
    /// unknown or has none. Never fails.
    pub fn get_user_settings(&self, username: &str) -> Settings {
        let users = self.load();
        users
            .get(username)
            .and_then(|record| record.settings.clone())
            .unwrap_or_default()
    }

    /// All usernames in document order
    pub fn list_users(&self) -> Vec<String> {
        self.load().keys().cloned().collect()
    }

    /// Remove a user. Returns `Ok(false)` when the username is unknown.
    pub fn delete_user(&self, username: &str) -> Result<bool> {
        let mut users = self.load();

        if users.shift_remove(username).is_none() {
            return Ok(false);
        }
        self.save(&users)?;

        info!("Deleted user: {}", username);
        Ok(true)
    }
}
