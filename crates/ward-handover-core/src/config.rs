//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::warn;

pub const DB_PATH_VAR: &str = "WARD_HANDOVER_DB_PATH";
pub const USERNAME_VAR: &str = "WARD_HANDOVER_USERNAME";
pub const PASSWORD_VAR: &str = "WARD_HANDOVER_PASSWORD";
pub const ADMIN_PASSWORD_VAR: &str = "WARD_HANDOVER_ADMIN_PASSWORD";

pub const DEFAULT_DB_PATH: &str = "ward_handover.db";
const DEFAULT_USERNAME: &str = "ward";
const DEFAULT_PASSWORD: &str = "wardstaff";
const DEFAULT_ADMIN_PASSWORD: &str = "wardadmin";

/// Store location and shared credentials.
///
/// Passwords are never held in the clear; only their SHA-256 hex digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoverConfig {
    pub db_path: PathBuf,
    pub username: String,
    password_digest: String,
    admin_password_digest: String,
}

impl HandoverConfig {
    pub fn new(
        db_path: impl Into<PathBuf>,
        username: impl Into<String>,
        password: &str,
        admin_password: &str,
    ) -> Self {
        Self {
            db_path: db_path.into(),
            username: username.into(),
            password_digest: sha256_hex(password),
            admin_password_digest: sha256_hex(admin_password),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = get(DB_PATH_VAR).unwrap_or_else(|| {
            warn!("{DB_PATH_VAR} not set, using {DEFAULT_DB_PATH}");
            DEFAULT_DB_PATH.to_string()
        });
        let username = get(USERNAME_VAR).unwrap_or_else(|| {
            warn!("{USERNAME_VAR} not set, using default username");
            DEFAULT_USERNAME.to_string()
        });
        let password = get(PASSWORD_VAR).unwrap_or_else(|| {
            warn!("{PASSWORD_VAR} not set, using default password");
            DEFAULT_PASSWORD.to_string()
        });
        let admin_password = get(ADMIN_PASSWORD_VAR).unwrap_or_else(|| {
            warn!("{ADMIN_PASSWORD_VAR} not set, using default admin password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        Self::new(db_path, username, &password, &admin_password)
    }

    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }

    pub fn admin_password_digest(&self) -> &str {
        &self.admin_password_digest
    }
}

/// Lowercase hex SHA-256 of a UTF-8 string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let vars: HashMap<&str, &str> = [
            (DB_PATH_VAR, "/data/ward.db"),
            (USERNAME_VAR, "ent"),
            (PASSWORD_VAR, "secret"),
            (ADMIN_PASSWORD_VAR, "root"),
        ]
        .into_iter()
        .collect();

        let config = HandoverConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from("/data/ward.db"));
        assert_eq!(config.username, "ent");
        assert_eq!(config.password_digest(), sha256_hex("secret"));
        assert_eq!(config.admin_password_digest(), sha256_hex("root"));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = HandoverConfig::from_lookup(|k| {
            (k == USERNAME_VAR).then(|| "   ".to_string())
        });
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.username, DEFAULT_USERNAME);
        assert_eq!(config.password_digest(), sha256_hex(DEFAULT_PASSWORD));
    }

    #[test]
    fn test_digest_not_plaintext() {
        let config = HandoverConfig::new("x.db", "u", "pw", "admin");
        assert_ne!(config.password_digest(), "pw");
        assert_eq!(config.password_digest().len(), 64);
    }
}
