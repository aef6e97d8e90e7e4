//! Credential storage and management
//!
//! The user store is built once from configuration at startup and never
//! mutated afterwards, so request handlers can share it without locking.

use log::warn;
use std::collections::HashMap;

use crate::auth::password;
use crate::config::UserEntry;

/// A known user and their stored credential
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub hashed_password: String,
    pub disabled: bool,
}

/// Read-only mapping of username to user record
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, User>,
}

impl UserStore {
    /// Build the store from configured user entries
    ///
    /// Entries carrying a plaintext `password` are hashed here, mirroring
    /// the hash-at-startup behavior expected of demo configurations.
    pub fn from_entries(entries: &[UserEntry]) -> Result<Self, bcrypt::BcryptError> {
        let mut users = HashMap::new();

        for entry in entries {
            let hashed_password = match (&entry.password_hash, &entry.password) {
                (Some(hash), _) => hash.clone(),
                (None, Some(plain)) => {
                    warn!(
                        "User '{}' configured with a plaintext password; hashing at startup",
                        entry.username
                    );
                    password::hash_password(plain)?
                }
                // Rejected by config validation before we get here
                (None, None) => continue,
            };

            users.insert(
                entry.username.clone(),
                User {
                    username: entry.username.clone(),
                    full_name: entry.full_name.clone(),
                    email: entry.email.clone(),
                    hashed_password,
                    disabled: entry.disabled,
                },
            );
        }

        Ok(Self { users })
    }

    /// Look up a user by username
    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// Number of configured users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(username: &str, password: &str, disabled: bool) -> UserEntry {
        UserEntry {
            username: username.to_string(),
            full_name: String::new(),
            email: String::new(),
            disabled,
            password: None,
            // Cost 4 keeps test startup fast
            password_hash: Some(bcrypt::hash(password, 4).unwrap()),
        }
    }

    #[test]
    fn test_lookup_known_user() {
        let store = UserStore::from_entries(&[entry("johndoe", "secretpassword", false)]).unwrap();
        let user = store.get("johndoe").unwrap();
        assert_eq!(user.username, "johndoe");
        assert!(!user.disabled);
        assert!(password::verify_password(
            "secretpassword",
            &user.hashed_password
        ));
    }

    #[test]
    fn test_lookup_unknown_user() {
        let store = UserStore::from_entries(&[entry("johndoe", "secretpassword", false)]).unwrap();
        assert!(store.get("nosuchuser").is_none());
    }

    #[test]
    fn test_disabled_flag_preserved() {
        let store = UserStore::from_entries(&[entry("mallory", "pw", true)]).unwrap();
        assert!(store.get("mallory").unwrap().disabled);
    }

    #[test]
    fn test_store_size() {
        let store = UserStore::from_entries(&[
            entry("johndoe", "a", false),
            entry("janedoe", "b", false),
        ])
        .unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }
}
