//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, token carrier, router
//!
//! ## Features
//! - Email + password signup with automatic login
//! - Server-side sessions with opaque random tokens
//! - Sliding session expiry with a per-user session cap
//! - Pluggable token carrier (cookie, query parameter, bearer header)
//! - In-process rate limiting for login and signup
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Tokens carry 256 bits of entropy; no information is encoded in them
//! - Uniform failure for unknown email vs wrong password
//! - Lockout after repeated failed login attempts

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::check_session::CurrentUser;
pub use application::config::{AuthConfig, CarrierKind};
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::carrier::TokenCarrier;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
