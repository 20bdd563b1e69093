//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod check_session;
pub mod config;
pub mod delete_account;
pub mod login;
pub mod register;
pub mod sign_out;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use check_session::{CheckSessionUseCase, CurrentUser};
pub use config::AuthConfig;
pub use delete_account::DeleteAccountUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use sign_out::SignOutUseCase;

use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Create a session for a user, enforcing the per-user cap
///
/// When the user already holds `max_sessions_per_user` live sessions,
/// the oldest ones are evicted first so the newest login always wins.
/// Expired rows do not count against the cap.
pub(crate) async fn issue_session<S>(
    session_repo: &S,
    config: &AuthConfig,
    user_id: &UserId,
) -> AuthResult<Session>
where
    S: SessionRepository,
{
    let existing = session_repo.find_by_user_id(user_id).await?;
    let live: Vec<&Session> = existing.iter().filter(|s| !s.is_expired()).collect();

    // Make room for the one we are about to create
    if live.len() >= config.max_sessions_per_user {
        let excess = live.len() + 1 - config.max_sessions_per_user;
        for session in live.iter().take(excess) {
            session_repo.delete(&session.token).await?;
            tracing::debug!(
                user_id = %session.user_id,
                token_preview = session.token.preview(),
                "Evicted oldest session over per-user cap"
            );
        }
    }

    let session = Session::new(user_id.clone(), config.window());
    session_repo.create(&session).await?;

    Ok(session)
}
