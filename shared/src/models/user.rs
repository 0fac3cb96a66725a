//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// Reserved username; the user cannot be created, modified or deleted via the API
pub const ADMIN_USERNAME: &str = "admin";

/// User entity
///
/// `password` holds an argon2 hash in the store and is always cleared before
/// the record leaves the gateway (session tokens, API responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    /// Ordered role references; only `id` is trusted, capabilities are
    /// reloaded from the store before use
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_expiry: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: String::new(),
            phone: String::new(),
            roles: Vec::new(),
            external_account: None,
            session_expiry: None,
        }
    }

    /// Copy of this user safe to hand out: password cleared
    pub fn sanitized(&self) -> Self {
        Self {
            password: String::new(),
            ..self.clone()
        }
    }

    /// Whether this is the protected admin user
    pub fn is_protected(&self) -> bool {
        is_protected_username(&self.username)
    }
}

pub fn is_protected_username(username: &str) -> bool {
    username == ADMIN_USERNAME
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    /// Role ids
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New username (rename)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Capability;

    #[test]
    fn test_sanitized_clears_password_only() {
        let mut user = User::new("alice");
        user.password = "$argon2id$v=19$...".to_string();
        user.phone = "555-0100".to_string();
        user.roles
            .push(Role::new("r1", "viewer", Capability::from_bits(1)));

        let clean = user.sanitized();
        assert!(clean.password.is_empty());
        assert_eq!(clean.phone, "555-0100");
        assert_eq!(clean.roles, user.roles);
    }

    #[test]
    fn test_protected_username() {
        assert!(User::new("admin").is_protected());
        assert!(!User::new("Admin").is_protected());
        assert!(!User::new("alice").is_protected());
    }
}
