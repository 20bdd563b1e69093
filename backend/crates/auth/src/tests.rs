//! Use-case tests against the in-memory repository
//!
//! These run the real application layer (Argon2id hashing included)
//! with no database behind it.

use std::sync::Arc;
use std::time::Duration;

use platform::rate_limit::{FixedWindowLimiter, RateLimitConfig};

use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, CheckSessionUseCase, CurrentUser,
    DeleteAccountUseCase, LoginInput, LoginOutput, LoginUseCase, RegisterInput, RegisterOutput,
    RegisterUseCase, SignOutUseCase, config::AuthConfig,
};
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::session_token::SessionToken;
use crate::error::{AuthError, AuthResult};
use crate::infra::memory::MemAuthRepository;

struct Harness {
    repo: Arc<MemAuthRepository>,
    limiter: Arc<FixedWindowLimiter>,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new(config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(MemAuthRepository::new()),
            limiter: Arc::new(FixedWindowLimiter::new()),
            config: Arc::new(config),
        }
    }

    /// Default harness: 24h window, signup throttle relaxed so tests
    /// can create accounts freely
    fn default() -> Self {
        Self::new(Self::base_config())
    }

    fn base_config() -> AuthConfig {
        AuthConfig {
            signup_limit: RateLimitConfig::new(1000, Duration::from_secs(3600)),
            ..AuthConfig::default()
        }
    }

    async fn register(&self, email: &str, password: &str) -> AuthResult<RegisterOutput> {
        let use_case = RegisterUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.limiter.clone(),
            self.config.clone(),
        );
        use_case
            .execute(RegisterInput {
                email: email.to_string(),
                password: password.to_string(),
                client_key: "signup:10.0.0.1".to_string(),
            })
            .await
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutput> {
        let use_case = LoginUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.limiter.clone(),
            self.config.clone(),
        );
        use_case
            .execute(LoginInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn check(&self, token: &str) -> AuthResult<CurrentUser> {
        let use_case = CheckSessionUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.config.clone(),
        );
        use_case.execute(token).await
    }
}

const PASSWORD: &str = "a sound passphrase";

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_then_validate_round_trip() {
    let h = Harness::default();

    let out = h.register("  User@Example.COM  ", PASSWORD).await.unwrap();
    assert_eq!(out.user.email.as_str(), "user@example.com");

    // Token shape: 64 lowercase hex characters
    assert_eq!(out.token.as_str().len(), 64);
    assert!(SessionToken::parse(out.token.as_str()).is_some());

    let current = h.check(out.token.as_str()).await.unwrap();
    assert_eq!(current.user_id, out.user.user_id);
    assert_eq!(current.email.as_str(), "user@example.com");
}

#[tokio::test]
async fn test_duplicate_email_rejected_case_insensitive() {
    let h = Harness::default();

    h.register("user@example.com", PASSWORD).await.unwrap();
    let err = h.register("USER@Example.com", PASSWORD).await.unwrap_err();

    assert!(matches!(err, AuthError::DuplicateEmail));
}

#[tokio::test]
async fn test_register_rejects_invalid_email_and_weak_password() {
    let h = Harness::default();

    assert!(matches!(
        h.register("not-an-email", PASSWORD).await.unwrap_err(),
        AuthError::InvalidEmail(_)
    ));
    assert!(matches!(
        h.register("user@example.com", "short").await.unwrap_err(),
        AuthError::WeakPassword(_)
    ));

    // Neither attempt may have left a user behind
    let email = Email::new("user@example.com").unwrap();
    assert!(!h.repo.exists_by_email(&email).await.unwrap());
}

#[tokio::test]
async fn test_signup_throttled_per_client() {
    let h = Harness::new(AuthConfig {
        signup_limit: RateLimitConfig::new(2, Duration::from_secs(3600)),
        ..AuthConfig::default()
    });

    h.register("one@example.com", PASSWORD).await.unwrap();
    h.register("two@example.com", PASSWORD).await.unwrap();

    let err = h.register("three@example.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::RateLimited { .. }));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_failure_is_uniform() {
    let h = Harness::default();
    h.register("user@example.com", PASSWORD).await.unwrap();

    let wrong_password = h.login("user@example.com", "wrong password").await.unwrap_err();
    let unknown_email = h.login("ghost@example.com", PASSWORD).await.unwrap_err();
    let invalid_email = h.login("not-an-email", PASSWORD).await.unwrap_err();

    // All three collapse into the same variant with the same message
    for err in [&wrong_password, &unknown_email, &invalid_email] {
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
    }
}

#[tokio::test]
async fn test_login_is_case_insensitive_on_email() {
    let h = Harness::default();
    h.register("user@example.com", PASSWORD).await.unwrap();

    let out = h.login("USER@EXAMPLE.COM", PASSWORD).await.unwrap();
    assert_eq!(out.user.email.as_str(), "user@example.com");
}

#[tokio::test]
async fn test_failed_logins_lock_out() {
    let h = Harness::new(AuthConfig {
        login_limit: RateLimitConfig::new(3, Duration::from_secs(900))
            .with_lockout(Duration::from_secs(900)),
        ..Harness::base_config()
    });
    h.register("user@example.com", PASSWORD).await.unwrap();

    for _ in 0..3 {
        let err = h.login("user@example.com", "wrong password").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    // Locked out now, even with the correct password
    let err = h.login("user@example.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::RateLimited { .. }));
}

#[tokio::test]
async fn test_successful_login_resets_failure_counter() {
    let h = Harness::new(AuthConfig {
        login_limit: RateLimitConfig::new(3, Duration::from_secs(900)),
        ..Harness::base_config()
    });
    h.register("user@example.com", PASSWORD).await.unwrap();

    h.login("user@example.com", "wrong password").await.unwrap_err();
    h.login("user@example.com", "wrong password").await.unwrap_err();
    h.login("user@example.com", PASSWORD).await.unwrap();

    // Counter started over; two more failures still leave room
    h.login("user@example.com", "wrong password").await.unwrap_err();
    h.login("user@example.com", "wrong password").await.unwrap_err();
    h.login("user@example.com", PASSWORD).await.unwrap();
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_sliding_expiry_strictly_increases() {
    let h = Harness::default();
    let out = h.register("user@example.com", PASSWORD).await.unwrap();

    let first = h.check(out.token.as_str()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = h.check(out.token.as_str()).await.unwrap();

    assert!(second.expires_at > first.expires_at);
}

#[tokio::test]
async fn test_expired_session_rejected_and_removed() {
    let h = Harness::new(AuthConfig {
        session_window: Duration::from_millis(50),
        ..Harness::base_config()
    });
    let out = h.register("user@example.com", PASSWORD).await.unwrap();

    tokio::time::sleep(Duration::from_millis(120)).await;

    let err = h.check(out.token.as_str()).await.unwrap_err();
    assert!(matches!(err, AuthError::SessionInvalid));

    // Lazy expiry deleted the row
    let stored = h.repo.find_by_token(&out.token).await.unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_cleanup_expired_removes_only_dead_rows() {
    let h = Harness::default();
    let out = h.register("user@example.com", PASSWORD).await.unwrap();

    // Two rows already past their deadline alongside the live one
    let dead_a = Session::new(out.user.user_id, chrono::Duration::seconds(-1));
    let dead_b = Session::new(out.user.user_id, chrono::Duration::seconds(-1));
    SessionRepository::create(h.repo.as_ref(), &dead_a)
        .await
        .unwrap();
    SessionRepository::create(h.repo.as_ref(), &dead_b)
        .await
        .unwrap();

    let removed = h.repo.cleanup_expired().await.unwrap();
    assert_eq!(removed, 2);

    assert!(h.repo.find_by_token(&dead_a.token).await.unwrap().is_none());
    assert!(h.repo.find_by_token(&dead_b.token).await.unwrap().is_none());

    // The live session survived the sweep and still validates
    let current = h.check(out.token.as_str()).await.unwrap();
    assert_eq!(current.user_id, out.user.user_id);

    // Nothing left to sweep
    assert_eq!(h.repo.cleanup_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let h = Harness::default();

    for raw in ["", "short", &"Z".repeat(64)] {
        let err = h.check(raw).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionInvalid));
    }
}

#[tokio::test]
async fn test_session_cap_evicts_oldest() {
    let h = Harness::default();
    let first = h.register("user@example.com", PASSWORD).await.unwrap();

    let mut later = Vec::new();
    for _ in 0..5 {
        // Distinct created_at so eviction order is unambiguous
        tokio::time::sleep(Duration::from_millis(5)).await;
        later.push(h.login("user@example.com", PASSWORD).await.unwrap().token);
    }

    // Six issued against a cap of five: the first one is gone
    let err = h.check(first.token.as_str()).await.unwrap_err();
    assert!(matches!(err, AuthError::SessionInvalid));

    for token in &later {
        h.check(token.as_str()).await.unwrap();
    }
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let h = Harness::default();
    let out = h.register("user@example.com", PASSWORD).await.unwrap();

    let use_case = SignOutUseCase::new(h.repo.clone());
    use_case.execute(out.token.as_str()).await.unwrap();
    use_case.execute(out.token.as_str()).await.unwrap();
    use_case.execute("not even a token").await.unwrap();

    let err = h.check(out.token.as_str()).await.unwrap_err();
    assert!(matches!(err, AuthError::SessionInvalid));
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let h = Harness::default();
    let first = h.register("user@example.com", PASSWORD).await.unwrap();
    let second = h.login("user@example.com", PASSWORD).await.unwrap();
    let third = h.login("user@example.com", PASSWORD).await.unwrap();

    let use_case = SignOutUseCase::new(h.repo.clone());
    let revoked = use_case.execute_all(&first.user.user_id).await.unwrap();
    assert_eq!(revoked, 3);

    for token in [&first.token, &second.token, &third.token] {
        let err = h.check(token.as_str()).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionInvalid));
    }
}

// ============================================================================
// Account management
// ============================================================================

#[tokio::test]
async fn test_change_password_flow() {
    let h = Harness::default();
    let out = h.register("user@example.com", PASSWORD).await.unwrap();
    let user_id = out.user.user_id.clone();

    let use_case = ChangePasswordUseCase::new(h.repo.clone());

    // Wrong current password
    let err = use_case
        .execute(ChangePasswordInput {
            user_id: user_id.clone(),
            old_password: "wrong password".to_string(),
            new_password: "another passphrase".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    // New password fails policy
    let err = use_case
        .execute(ChangePasswordInput {
            user_id: user_id.clone(),
            old_password: PASSWORD.to_string(),
            new_password: "short".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WeakPassword(_)));

    // Successful change
    use_case
        .execute(ChangePasswordInput {
            user_id,
            old_password: PASSWORD.to_string(),
            new_password: "another passphrase".to_string(),
        })
        .await
        .unwrap();

    h.login("user@example.com", "another passphrase").await.unwrap();
    let err = h.login("user@example.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_delete_account_revokes_sessions_and_login() {
    let h = Harness::default();
    let out = h.register("user@example.com", PASSWORD).await.unwrap();

    let use_case = DeleteAccountUseCase::new(h.repo.clone(), h.repo.clone());
    use_case.execute(&out.user.user_id).await.unwrap();

    let err = h.check(out.token.as_str()).await.unwrap_err();
    assert!(matches!(err, AuthError::SessionInvalid));

    let err = h.login("user@example.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let email = Email::new("user@example.com").unwrap();
    assert!(!h.repo.exists_by_email(&email).await.unwrap());
}
