//! Session Token Value Object
//!
//! Opaque 64-character lowercase hex token (32 random bytes, 256 bits
//! of entropy). The token encodes nothing: no user id, no timestamps,
//! no signature. All session state lives server-side and presenting a
//! token is the sole proof of ownership.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token length in characters (32 bytes hex-encoded)
pub const SESSION_TOKEN_LENGTH: usize = 64;

/// Entropy in bytes behind each token
const SESSION_TOKEN_ENTROPY_BYTES: usize = 32;

/// Opaque session token
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        Self(platform::crypto::random_token_hex(
            SESSION_TOKEN_ENTROPY_BYTES,
        ))
    }

    /// Parse a client-supplied token
    ///
    /// Anything that is not exactly 64 lowercase hex characters is
    /// rejected up front, before any store lookup.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != SESSION_TOKEN_LENGTH || !platform::crypto::is_lower_hex(raw) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log correlation without leaking the token
    pub fn preview(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken")
            .field(&format!("{}…", self.preview()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = SessionToken::generate();
        assert_eq!(token.as_str().len(), SESSION_TOKEN_LENGTH);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_round_trip() {
        let token = SessionToken::generate();
        let parsed = SessionToken::parse(token.as_str()).unwrap();
        assert_eq!(token, parsed);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(SessionToken::parse("").is_none());
        assert!(SessionToken::parse("short").is_none());
        assert!(SessionToken::parse(&"g".repeat(64)).is_none());
        assert!(SessionToken::parse(&"A".repeat(64)).is_none());
        assert!(SessionToken::parse(&"a".repeat(65)).is_none());
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::generate();
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains(token.as_str()));
        assert!(rendered.contains(token.preview()));
    }
}
