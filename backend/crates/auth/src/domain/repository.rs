//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer.

use crate::domain::entity::{credential::Credential, session::Session, user::User};
use crate::domain::value_object::{email::Email, session_token::SessionToken, user_id::UserId};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Delete a user (cascades to credentials and sessions)
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Create credentials
    async fn create(&self, credential: &Credential) -> AuthResult<()>;

    /// Find credentials by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>>;

    /// Update credentials (password change)
    async fn update(&self, credential: &Credential) -> AuthResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by token (expired rows may still be returned;
    /// callers decide expiry)
    async fn find_by_token(&self, token: &SessionToken) -> AuthResult<Option<Session>>;

    /// Update session (sliding expiry)
    async fn update(&self, session: &Session) -> AuthResult<()>;

    /// Delete a session. Idempotent; returns whether a row existed.
    async fn delete(&self, token: &SessionToken) -> AuthResult<bool>;

    /// Delete all sessions for a user, returns count deleted
    async fn delete_all_for_user(&self, user_id: &UserId) -> AuthResult<u64>;

    /// All sessions for a user, oldest first by creation time
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<Session>>;

    /// Bulk-delete expired sessions, returns count deleted
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
