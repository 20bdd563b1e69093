//! Check Session Use Case
//!
//! Validates a presented token, slides expiry forward, and hydrates
//! the owning user. Expired rows are deleted lazily here; the periodic
//! sweep is hygiene only.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, session_token::SessionToken, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// Authenticated caller, injected into request extensions by the
/// middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: Email,
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
}

/// Check session use case
pub struct CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Validate a token and return the authenticated user
    ///
    /// Malformed, unknown, expired, and revoked tokens all collapse
    /// into `SessionInvalid`.
    pub async fn execute(&self, raw_token: &str) -> AuthResult<CurrentUser> {
        let token = SessionToken::parse(raw_token).ok_or(AuthError::SessionInvalid)?;

        let session = self
            .session_repo
            .find_by_token(&token)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            // Lazy expiry: the row dies the moment it is seen dead
            self.session_repo.delete(&token).await?;
            tracing::debug!(
                token_preview = token.preview(),
                "Expired session removed during validation"
            );
            return Err(AuthError::SessionInvalid);
        }

        // Sliding renewal. Concurrent validations race on this UPDATE,
        // but both write a fresh window so the race is benign.
        let mut session = session;
        session.renew(self.config.window());
        self.session_repo.update(&session).await?;

        let Some(user) = self.user_repo.find_by_id(&session.user_id).await? else {
            // Owner deleted between session creation and now; drop the
            // orphan row
            self.session_repo.delete(&token).await?;
            return Err(AuthError::SessionInvalid);
        };

        Ok(CurrentUser {
            user_id: user.user_id,
            email: user.email,
            token: session.token,
            expires_at: session.expires_at,
        })
    }

    /// Non-failing variant for status endpoints: invalid sessions are
    /// `None`, infrastructure errors still propagate
    pub async fn authenticate(&self, raw_token: &str) -> AuthResult<Option<CurrentUser>> {
        match self.execute(raw_token).await {
            Ok(current) => Ok(Some(current)),
            Err(AuthError::SessionInvalid) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
