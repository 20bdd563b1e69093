//! Auth Router

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;

use platform::rate_limit::{FixedWindowLimiter, RateLimitStore};

use crate::application::config::AuthConfig;
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::carrier::TokenCarrier;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_session};

/// Create the Auth router with the PostgreSQL repository and the
/// in-process rate limiter
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, Arc::new(FixedWindowLimiter::new()), config)
}

/// Create an Auth router for any repository and limiter implementation
///
/// The limiter is shared so the caller can keep a handle for periodic
/// record cleanup.
pub fn auth_router_generic<R, L>(repo: R, limiter: Arc<L>, config: AuthConfig) -> Router
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let config = Arc::new(config);
    let carrier = TokenCarrier::from_config(&config);

    let state = AuthAppState {
        repo: repo.clone(),
        limiter,
        config: config.clone(),
        carrier: carrier.clone(),
    };

    let mw_state = AuthMiddlewareState {
        repo,
        config,
        carrier,
    };

    let protected = Router::new()
        .route("/logout-all", post(handlers::logout_all::<R, L>))
        .route("/password", post(handlers::change_password::<R, L>))
        .route("/account", delete(handlers::delete_account::<R, L>))
        .route_layer(middleware::from_fn_with_state(
            mw_state,
            require_session::<R>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<R, L>))
        .route("/login", post(handlers::login::<R, L>))
        .route("/session", get(handlers::session_status::<R, L>))
        .route("/logout", post(handlers::logout::<R, L>))
        .merge(protected)
        .with_state(state)
}
