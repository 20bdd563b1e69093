//! User Entity
//!
//! Core user entity. The password hash lives in the separate
//! Credential entity so user rows can be handed to callers without
//! carrying secrets.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, user_id::UserId};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Normalized email (unique, used for login)
    pub email: Email,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(email: Email) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            created_at: now,
            updated_at: now,
        }
    }
}
