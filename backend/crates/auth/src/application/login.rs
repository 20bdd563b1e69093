//! Login Use Case
//!
//! Authenticates by email and password and creates a session. Every
//! failure on the credential path collapses into the same
//! `InvalidCredentials` so responses cannot distinguish an unknown
//! email from a wrong password.

use std::sync::Arc;

use platform::rate_limit::RateLimitStore;

use crate::application::config::AuthConfig;
use crate::application::issue_session;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, session_token::SessionToken, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: SessionToken,
}

/// Login use case
pub struct LoginUseCase<U, C, S, L>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
    L: RateLimitStore,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    session_repo: Arc<S>,
    limiter: Arc<L>,
    config: Arc<AuthConfig>,
}

impl<U, C, S, L> LoginUseCase<U, C, S, L>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
    L: RateLimitStore,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        session_repo: Arc<S>,
        limiter: Arc<L>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            session_repo,
            limiter,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Normalize before keying the limiter so case variants of one
        // email share a counter
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let limit_key = format!("login:{}", email.as_str());

        let throttle = self
            .limiter
            .check(&limit_key, &self.config.login_limit)
            .await;
        if !throttle.allowed {
            return Err(AuthError::RateLimited {
                retry_after_secs: throttle.retry_after.map(|d| d.as_secs()).unwrap_or(0),
            });
        }

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            self.limiter.record(&limit_key).await;
            return Err(AuthError::InvalidCredentials);
        };

        let credential = self
            .credential_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| {
                AuthError::Internal(format!("credential row missing for user {}", user.user_id))
            })?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !credential.password_hash.verify(&raw_password) {
            self.limiter.record(&limit_key).await;
            return Err(AuthError::InvalidCredentials);
        }

        // Successful login clears the failure counter
        self.limiter.reset(&limit_key).await;

        let session = issue_session(self.session_repo.as_ref(), &self.config, &user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            token_preview = session.token.preview(),
            "User logged in"
        );

        Ok(LoginOutput {
            user,
            token: session.token,
        })
    }
}
