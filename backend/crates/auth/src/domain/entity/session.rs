//! Session Entity
//!
//! A server-side session keyed by its opaque token. Expiry is sliding:
//! every successful validation pushes `expires_at` to now + window, so
//! a session only dies after a full window of inactivity.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{session_token::SessionToken, user_id::UserId};

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque token, primary key
    pub token: SessionToken,
    /// Owning user
    pub user_id: UserId,
    /// Absolute expiry; `expires_at <= now` means dead
    pub expires_at: DateTime<Utc>,
    /// Created timestamp (cap eviction deletes oldest first)
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session expiring one window from now
    pub fn new(user_id: UserId, window: Duration) -> Self {
        let now = Utc::now();

        Self {
            token: SessionToken::generate(),
            user_id,
            expires_at: now + window,
            created_at: now,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Slide expiry to a full window from now
    pub fn renew(&mut self, window: Duration) {
        self.expires_at = Utc::now() + window;
    }
}
