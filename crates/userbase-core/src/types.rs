//! User record type definitions

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::password::{generate_salt, hash_password};

/// Per-user settings mapping, in insertion order
pub type Settings = IndexMap<String, Value>;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    User,
    /// Administrative account
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}' (expected 'user' or 'admin')")),
        }
    }
}

/// One stored account entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Hex SHA-256 digest of password + salt
    pub password_hash: Option<String>,

    /// Per-user random salt, rotated on every password change
    pub salt: Option<String>,

    /// Account role
    #[serde(default)]
    pub role: Role,

    /// Creation time in seconds since the Unix epoch; set once, never mutated
    pub created_at: f64,

    /// Per-user settings, created lazily on first write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl UserRecord {
    /// Create a record with a freshly salted password hash
    pub fn new(password: &str, role: Role) -> Self {
        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);

        Self {
            password_hash: Some(password_hash),
            salt: Some(salt),
            role,
            created_at: now_epoch(),
            settings: None,
        }
    }
}

/// Current time as fractional seconds since the Unix epoch
fn now_epoch() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"user\"").unwrap(),
            Role::User
        );
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_new_record_is_salted() {
        let record = UserRecord::new("secret", Role::User);

        let salt = record.salt.as_deref().unwrap();
        let hash = record.password_hash.as_deref().unwrap();

        assert_eq!(hash, hash_password("secret", salt));
        assert!(record.created_at > 0.0);
        assert!(record.settings.is_none());
    }

    #[test]
    fn test_settings_omitted_when_absent() {
        let record = UserRecord::new("secret", Role::User);
        let json = serde_json::to_string(&record).unwrap();

        assert!(!json.contains("settings"));
    }
}
