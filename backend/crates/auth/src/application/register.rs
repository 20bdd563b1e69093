//! Register Use Case
//!
//! Creates a new account and logs it in immediately, so the client
//! holds a session token straight after signup.

use std::sync::Arc;

use platform::rate_limit::RateLimitStore;

use crate::application::config::AuthConfig;
use crate::application::issue_session;
use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    session_token::SessionToken,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    /// Rate-limit key identifying the client (IP-derived)
    pub client_key: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
    pub token: SessionToken,
}

/// Register use case
pub struct RegisterUseCase<U, C, S, L>
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

impl<U, C, S, L> RegisterUseCase<U, C, S, L>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let throttle = self
            .limiter
            .check(&input.client_key, &self.config.signup_limit)
            .await;
        if !throttle.allowed {
            return Err(AuthError::RateLimited {
                retry_after_secs: throttle.retry_after.map(|d| d.as_secs()).unwrap_or(0),
            });
        }

        // Validation order matters: format first, then uniqueness, then
        // password, so the cheapest checks run before the hash.
        let email = Email::new(input.email)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password)?;

        let user = User::new(email);
        let credential = Credential::new(user.user_id.clone(), password_hash);

        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credential).await?;

        self.limiter.record(&input.client_key).await;

        // Auto-login
        let session = issue_session(self.session_repo.as_ref(), &self.config, &user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            "User registered"
        );

        Ok(RegisterOutput {
            user,
            token: session.token,
        })
    }
}
