//! Delete Account Use Case
//!
//! Removes the user row; credentials and sessions follow via cascade.
//! Sessions are revoked explicitly first so the account is unusable
//! even if the store lacks cascading deletes.

use std::sync::Arc;

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Delete account use case
pub struct DeleteAccountUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
}

impl<U, S> DeleteAccountUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            session_repo,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        let revoked = self.session_repo.delete_all_for_user(user_id).await?;

        let deleted = self.user_repo.delete(user_id).await?;
        if !deleted {
            // Session pointed at a user that is already gone
            return Err(AuthError::SessionInvalid);
        }

        tracing::info!(
            user_id = %user_id,
            sessions_revoked = revoked,
            "Account deleted"
        );

        Ok(())
    }
}
