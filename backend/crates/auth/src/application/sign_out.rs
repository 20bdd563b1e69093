//! Sign Out Use Case
//!
//! Revokes sessions. Single sign-out is idempotent: a malformed or
//! already-dead token still clears cleanly on the client.

use std::sync::Arc;

use crate::domain::repository::SessionRepository;
use crate::domain::value_object::session_token::SessionToken;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Sign out the session behind a raw token. Always succeeds short
    /// of an infrastructure failure.
    pub async fn execute(&self, raw_token: &str) -> AuthResult<()> {
        let Some(token) = SessionToken::parse(raw_token) else {
            return Ok(());
        };

        let existed = self.session_repo.delete(&token).await?;
        if existed {
            tracing::info!(token_preview = token.preview(), "User signed out");
        }

        Ok(())
    }

    /// Revoke every session the user holds, current one included
    pub async fn execute_all(&self, user_id: &UserId) -> AuthResult<u64> {
        let revoked = self.session_repo.delete_all_for_user(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            revoked,
            "User signed out everywhere"
        );

        Ok(revoked)
    }
}
