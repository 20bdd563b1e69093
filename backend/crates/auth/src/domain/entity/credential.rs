//! Credential Entity
//!
//! Holds the password hash for a user. Exactly one row per user,
//! created with the user and removed with the user.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{user_id::UserId, user_password::UserPassword};

/// Credential entity
#[derive(Debug, Clone)]
pub struct Credential {
    /// Owning user
    pub user_id: UserId,
    /// Argon2id hash in PHC format
    pub password_hash: UserPassword,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Create credentials for a user
    pub fn new(user_id: UserId, password_hash: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored hash (password change)
    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}
