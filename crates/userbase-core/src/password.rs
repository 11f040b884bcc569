//! Salted password hashing
//!
//! Passwords are never stored or compared in plaintext. Each user gets a
//! random salt, and the store keeps the hex SHA-256 digest of
//! `password || salt`. Verification recomputes the digest with the stored
//! salt and compares the hex strings.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Salt length in raw bytes before hex encoding
pub const SALT_BYTES: usize = 16;

/// Generate a cryptographically secure random salt, hex-encoded
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a password with the given salt
///
/// Deterministic for the same `(password, salt)` pair, which is what
/// verification relies on. Pure function, no I/O.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
