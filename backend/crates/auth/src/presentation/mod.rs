//! Presentation Layer
//!
//! HTTP handlers, DTOs, token carrier, router, and middleware.

pub mod carrier;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use carrier::TokenCarrier;
pub use handlers::AuthAppState;
pub use middleware::{AuthMiddlewareState, require_session};
pub use router::{auth_router, auth_router_generic};
