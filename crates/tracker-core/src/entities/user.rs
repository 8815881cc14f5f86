//! User entity - an account known to the identity directory

use chrono::{DateTime, Utc};

use crate::value_objects::{Email, UserId};

/// User account
///
/// `password_hash` is absent for users provisioned by accepting an invitation
/// until they choose a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: Option<String>,
    pub roles: Vec<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified user with a password
    pub fn new(email: Email, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password_hash: Some(password_hash),
            roles: Vec::new(),
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a verified, password-less user for an invited guest
    pub fn provisioned(email: Email) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password_hash: None,
            roles: Vec::new(),
            verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    #[inline]
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
