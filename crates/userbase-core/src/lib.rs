//! # userbase-core
//!
//! Credential store for userbase including:
//! - Salted SHA-256 password hashing with per-user random salts
//! - Flat-file JSON persistence seeded with bootstrap accounts
//! - Per-user settings storage with additive merge
//!
//! The store is a local single-process file store. Every operation re-reads
//! the backing document and mutations rewrite it whole; there is no locking,
//! so concurrent writers race and the last write wins.

pub mod error;
pub mod password;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use password::{generate_salt, hash_password};
pub use store::{UserStore, Users};
pub use types::{Role, Settings, UserRecord};
