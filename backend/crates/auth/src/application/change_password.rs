//! Change Password Use Case
//!
//! Requires the current password before accepting a new one. Existing
//! sessions stay live; only the credential row changes.

use std::sync::Arc;

use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub user_id: UserId,
    pub old_password: String,
    pub new_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
}

impl<C> ChangePasswordUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>) -> Self {
        Self { credential_repo }
    }

    pub async fn execute(&self, input: ChangePasswordInput) -> AuthResult<()> {
        let mut credential = self
            .credential_repo
            .find_by_user_id(&input.user_id)
            .await?
            .ok_or_else(|| {
                AuthError::Internal(format!("credential row missing for user {}", input.user_id))
            })?;

        let old = RawPassword::new(input.old_password)
            .map_err(|_| AuthError::InvalidCredentials)?;
        if !credential.password_hash.verify(&old) {
            return Err(AuthError::InvalidCredentials);
        }

        // New password goes through the full policy, unlike the old one
        let new = RawPassword::new(input.new_password)?;
        let new_hash = UserPassword::from_raw(&new)?;

        credential.set_password(new_hash);
        self.credential_repo.update(&credential).await?;

        tracing::info!(user_id = %input.user_id, "Password changed");

        Ok(())
    }
}
