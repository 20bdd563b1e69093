//! In-Memory Repository Implementation
//!
//! Implements the same repository traits over hash maps behind a
//! mutex. Backs the use-case tests and works for local development
//! without a database. Not for production: state dies with the
//! process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::domain::entity::{credential::Credential, session::Session, user::User};
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, session_token::SessionToken, user_id::UserId};
use crate::error::AuthResult;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    credentials: HashMap<Uuid, Credential>,
    sessions: HashMap<String, Session>,
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct MemAuthRepository {
    inner: Arc<Mutex<Inner>>,
}

impl MemAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory repository lock poisoned")
    }
}

impl UserRepository for MemAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.lock()
            .users
            .insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.lock().users.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.lock().users.values().any(|u| u.email == *email))
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut inner = self.lock();
        let existed = inner.users.remove(user_id.as_uuid()).is_some();

        // Mirror the database cascade
        inner.credentials.remove(user_id.as_uuid());
        inner.sessions.retain(|_, s| s.user_id != *user_id);

        Ok(existed)
    }
}

impl CredentialRepository for MemAuthRepository {
    async fn create(&self, credential: &Credential) -> AuthResult<()> {
        self.lock()
            .credentials
            .insert(*credential.user_id.as_uuid(), credential.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        Ok(self.lock().credentials.get(user_id.as_uuid()).cloned())
    }

    async fn update(&self, credential: &Credential) -> AuthResult<()> {
        self.lock()
            .credentials
            .insert(*credential.user_id.as_uuid(), credential.clone());
        Ok(())
    }
}

impl SessionRepository for MemAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        self.lock()
            .sessions
            .insert(session.token.as_str().to_string(), session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &SessionToken) -> AuthResult<Option<Session>> {
        Ok(self.lock().sessions.get(token.as_str()).cloned())
    }

    async fn update(&self, session: &Session) -> AuthResult<()> {
        self.lock()
            .sessions
            .insert(session.token.as_str().to_string(), session.clone());
        Ok(())
    }

    async fn delete(&self, token: &SessionToken) -> AuthResult<bool> {
        Ok(self.lock().sessions.remove(token.as_str()).is_some())
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> AuthResult<u64> {
        let mut inner = self.lock();
        let before = inner.sessions.len();
        inner.sessions.retain(|_, s| s.user_id != *user_id);
        Ok((before - inner.sessions.len()) as u64)
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .lock()
            .sessions
            .values()
            .filter(|s| s.user_id == *user_id)
            .cloned()
            .collect();

        // Oldest first, token as tiebreaker for deterministic eviction
        sessions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.token.as_str().cmp(b.token.as_str()))
        });

        Ok(sessions)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut inner = self.lock();
        let before = inner.sessions.len();
        inner.sessions.retain(|_, s| !s.is_expired());
        Ok((before - inner.sessions.len()) as u64)
    }
}
