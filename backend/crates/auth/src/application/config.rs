//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::config::{ConfigError, Settings};
use platform::rate_limit::RateLimitConfig;

/// Re-export cookie types from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Where the session token travels between client and server
///
/// Tradeoffs:
/// - `Cookie`: HttpOnly keeps the token away from page scripts; sent
///   automatically, so cross-site requests need SameSite discipline.
/// - `Query`: token is part of the URL, so it lands in server logs,
///   browser history, and anything the URL is pasted into. Weakest
///   option; kept because some deployments want link-style sessions.
/// - `Bearer`: explicit `Authorization` header; immune to CSRF but the
///   client has to store the token somewhere itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarrierKind {
    #[default]
    Cookie,
    Query,
    Bearer,
}

impl CarrierKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cookie" => Some(Self::Cookie),
            "query" => Some(Self::Query),
            "bearer" => Some(Self::Bearer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Query => "query",
            Self::Bearer => "bearer",
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Sliding session window (24 hours)
    pub session_window: Duration,
    /// Maximum live sessions per user; oldest is evicted first
    pub max_sessions_per_user: usize,
    /// Session cookie settings (used when carrier is Cookie)
    pub cookie: CookieConfig,
    /// Token carrier strategy
    pub carrier: CarrierKind,
    /// Failed-login throttle, keyed by normalized email
    pub login_limit: RateLimitConfig,
    /// Signup throttle, keyed by client IP
    pub signup_limit: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_window: Duration::from_secs(24 * 3600),
            max_sessions_per_user: 5,
            cookie: CookieConfig::default(),
            carrier: CarrierKind::Cookie,
            login_limit: RateLimitConfig::login(),
            signup_limit: RateLimitConfig::signup(),
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie: CookieConfig {
                secure: false,
                ..CookieConfig::default()
            },
            ..Self::default()
        }
    }

    /// Build from runtime settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let session_window = settings.duration_hours("SESSION_WINDOW_HOURS", 24)?;
        let max_sessions = settings.u32("MAX_SESSIONS_PER_USER", 5)? as usize;

        let carrier_raw = settings.string("SESSION_CARRIER", "cookie");
        let carrier = CarrierKind::parse(&carrier_raw).ok_or_else(|| ConfigError::Invalid {
            key: "SESSION_CARRIER".to_string(),
            value: carrier_raw,
        })?;

        let cookie = CookieConfig {
            secure: settings.bool("COOKIE_SECURE", true)?,
            max_age_secs: Some(session_window.as_secs() as i64),
            ..CookieConfig::default()
        };

        Ok(Self {
            session_window,
            max_sessions_per_user: max_sessions,
            cookie,
            carrier,
            ..Self::default()
        })
    }

    /// Session window as a chrono duration for timestamp arithmetic
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.session_window.as_millis() as i64)
    }
}
