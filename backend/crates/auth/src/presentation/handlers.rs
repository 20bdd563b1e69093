//! HTTP Handlers

use axum::Json;
use axum::extract::{ConnectInfo, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::sync::Arc;

use platform::client::client_key;
use platform::rate_limit::RateLimitStore;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, CheckSessionUseCase, CurrentUser,
    DeleteAccountUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, SignOutUseCase,
};
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::carrier::{CarrierOutput, TokenCarrier};
use crate::presentation::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, LogoutAllResponse, RegisterRequest,
    SessionStatusResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, L>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub limiter: Arc<L>,
    pub config: Arc<AuthConfig>,
    pub carrier: TokenCarrier,
}

// Manual impl: Arc fields clone regardless of R / L
impl<R, L> Clone for AuthAppState<R, L>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
            carrier: self.carrier.clone(),
        }
    }
}

/// Attach carrier output (Set-Cookie header) to a response
fn with_carrier_headers(mut response: Response, output: &CarrierOutput) -> Response {
    if let Some(cookie) = &output.set_cookie {
        response
            .headers_mut()
            .append(header::SET_COOKIE, cookie.clone());
    }
    response
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, L>(
    State(state): State<AuthAppState<R, L>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.limiter.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        email: req.email,
        password: req.password,
        client_key: format!("signup:{}", client_key(&headers, Some(addr.ip()))),
    };

    let output = use_case.execute(input).await?;
    let carried = state.carrier.set(output.token.as_str());

    let body = AuthResponse {
        user_id: output.user.user_id.to_string(),
        email: output.user.email.to_string(),
        session_token: carried.token.clone(),
    };

    Ok(with_carrier_headers(
        (StatusCode::CREATED, Json(body)).into_response(),
        &carried,
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, L>(
    State(state): State<AuthAppState<R, L>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.limiter.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;
    let carried = state.carrier.set(output.token.as_str());

    let body = AuthResponse {
        user_id: output.user.user_id.to_string(),
        email: output.user.email.to_string(),
        session_token: carried.token.clone(),
    };

    Ok(with_carrier_headers(
        (StatusCode::OK, Json(body)).into_response(),
        &carried,
    ))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
pub async fn session_status<R, L>(
    State(state): State<AuthAppState<R, L>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let Some(token) = state.carrier.get(&headers, query.as_deref()) else {
        return Ok(Json(SessionStatusResponse::anonymous()));
    };

    let use_case =
        CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    match use_case.authenticate(&token).await? {
        Some(current) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            user_id: Some(current.user_id.to_string()),
            email: Some(current.email.to_string()),
            expires_at: Some(current.expires_at.timestamp_millis()),
        })),
        None => Ok(Json(SessionStatusResponse::anonymous())),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R, L>(
    State(state): State<AuthAppState<R, L>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> AuthResult<Response>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    if let Some(token) = state.carrier.get(&headers, query.as_deref()) {
        let use_case = SignOutUseCase::new(state.repo.clone());
        use_case.execute(&token).await?;
    }

    let carried = state.carrier.clear();

    Ok(with_carrier_headers(
        StatusCode::NO_CONTENT.into_response(),
        &carried,
    ))
}

/// POST /api/auth/logout-all (protected)
pub async fn logout_all<R, L>(
    State(state): State<AuthAppState<R, L>>,
    axum::Extension(current): axum::Extension<CurrentUser>,
) -> AuthResult<Response>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let use_case = SignOutUseCase::new(state.repo.clone());
    let revoked = use_case.execute_all(&current.user_id).await?;

    let carried = state.carrier.clear();

    Ok(with_carrier_headers(
        (StatusCode::OK, Json(LogoutAllResponse { revoked })).into_response(),
        &carried,
    ))
}

// ============================================================================
// Account Management (protected)
// ============================================================================

/// POST /api/auth/password
pub async fn change_password<R, L>(
    State(state): State<AuthAppState<R, L>>,
    axum::Extension(current): axum::Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone());

    use_case
        .execute(ChangePasswordInput {
            user_id: current.user_id,
            old_password: req.old_password,
            new_password: req.new_password,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/auth/account
pub async fn delete_account<R, L>(
    State(state): State<AuthAppState<R, L>>,
    axum::Extension(current): axum::Extension<CurrentUser>,
) -> AuthResult<Response>
where
    R: UserRepository + CredentialRepository + SessionRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let use_case = DeleteAccountUseCase::new(state.repo.clone(), state.repo.clone());
    use_case.execute(&current.user_id).await?;

    let carried = state.carrier.clear();

    Ok(with_carrier_headers(
        StatusCode::NO_CONTENT.into_response(),
        &carried,
    ))
}
