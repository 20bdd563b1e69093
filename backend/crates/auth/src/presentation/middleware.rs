//! Auth Middleware
//!
//! Guards protected routes. A valid session injects `CurrentUser` into
//! request extensions; anything else answers 401 before the handler
//! runs.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::CheckSessionUseCase;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthError;
use crate::presentation::carrier::TokenCarrier;

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub carrier: TokenCarrier,
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            carrier: self.carrier.clone(),
        }
    }
}

/// Middleware that requires a valid session
pub async fn require_session<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    let token = state
        .carrier
        .get(req.headers(), req.uri().query())
        .ok_or_else(|| AuthError::SessionInvalid.into_response())?;

    let use_case =
        CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let current = use_case
        .execute(&token)
        .await
        .map_err(|e| e.into_response())?;

    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}
