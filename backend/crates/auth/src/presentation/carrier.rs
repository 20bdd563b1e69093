//! Token Carrier
//!
//! Moves the session token between client and server. The strategy is
//! a configuration choice; handlers only see `get` / `set` / `clear`.
//! A `get` performed on the channel a `set` just produced returns the
//! same token, and `clear` followed by `get` returns nothing, all
//! within one request/response cycle.

use axum::http::{HeaderMap, HeaderValue, header};
use platform::cookie::{CookieConfig, extract_cookie};

use crate::application::config::{AuthConfig, CarrierKind};

/// Query parameter name for the `Query` strategy
pub const QUERY_PARAM: &str = "session";

/// What a `set` or `clear` asks the handler to emit
///
/// - `set_cookie`: a `Set-Cookie` header value, when the strategy is
///   cookie-based.
/// - `token`: a token to echo in the response body, when the client is
///   responsible for storing it (query and bearer strategies).
#[derive(Debug, Default)]
pub struct CarrierOutput {
    pub set_cookie: Option<HeaderValue>,
    pub token: Option<String>,
}

/// Token carrier, configured once at router construction
#[derive(Debug, Clone)]
pub struct TokenCarrier {
    kind: CarrierKind,
    cookie: CookieConfig,
}

impl TokenCarrier {
    pub fn new(kind: CarrierKind, cookie: CookieConfig) -> Self {
        Self { kind, cookie }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.carrier, config.cookie.clone())
    }

    pub fn kind(&self) -> CarrierKind {
        self.kind
    }

    /// Read the token from an incoming request
    pub fn get(&self, headers: &HeaderMap, query: Option<&str>) -> Option<String> {
        match self.kind {
            CarrierKind::Cookie => extract_cookie(headers, &self.cookie.name),
            CarrierKind::Query => query.and_then(query_param_value),
            CarrierKind::Bearer => bearer_token(headers),
        }
    }

    /// Produce the response-side output that stores the token
    pub fn set(&self, token: &str) -> CarrierOutput {
        match self.kind {
            CarrierKind::Cookie => CarrierOutput {
                set_cookie: header_value(self.cookie.build_set_cookie(token)),
                token: None,
            },
            // The client appends ?session=<token> to its links itself
            CarrierKind::Query | CarrierKind::Bearer => CarrierOutput {
                set_cookie: None,
                token: Some(token.to_string()),
            },
        }
    }

    /// Produce the response-side output that forgets the token
    pub fn clear(&self) -> CarrierOutput {
        match self.kind {
            CarrierKind::Cookie => CarrierOutput {
                set_cookie: header_value(self.cookie.build_delete_cookie()),
                token: None,
            },
            CarrierKind::Query | CarrierKind::Bearer => CarrierOutput::default(),
        }
    }
}

fn header_value(s: String) -> Option<HeaderValue> {
    HeaderValue::from_str(&s).ok()
}

/// Pull the session parameter out of a raw query string
///
/// Tokens are plain hex, so no percent-decoding is needed.
fn query_param_value(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == QUERY_PARAM && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn cookie_carrier() -> TokenCarrier {
        TokenCarrier::new(CarrierKind::Cookie, CookieConfig::default())
    }

    #[test]
    fn test_cookie_round_trip() {
        let carrier = cookie_carrier();

        let output = carrier.set(TOKEN);
        let set_cookie = output.set_cookie.unwrap();
        assert!(output.token.is_none());

        // Client echoes name=value back as a Cookie header
        let pair = set_cookie
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());

        assert_eq!(carrier.get(&headers, None).as_deref(), Some(TOKEN));
    }

    #[test]
    fn test_cookie_clear_then_get() {
        let carrier = cookie_carrier();

        let cleared = carrier.clear();
        let set_cookie = cleared.set_cookie.unwrap().to_str().unwrap().to_string();
        assert!(set_cookie.contains("Max-Age=0"));

        // The cleared cookie carries an empty value; a client honoring
        // it sends nothing back
        let headers = HeaderMap::new();
        assert_eq!(carrier.get(&headers, None), None);
    }

    #[test]
    fn test_query_round_trip() {
        let carrier = TokenCarrier::new(CarrierKind::Query, CookieConfig::default());

        let output = carrier.set(TOKEN);
        assert!(output.set_cookie.is_none());
        let token = output.token.unwrap();

        let query = format!("tab=overview&{}={}", QUERY_PARAM, token);
        let headers = HeaderMap::new();
        assert_eq!(carrier.get(&headers, Some(&query)).as_deref(), Some(TOKEN));

        assert_eq!(carrier.clear().token, None);
        assert_eq!(carrier.get(&headers, Some("tab=overview")), None);
    }

    #[test]
    fn test_bearer_round_trip() {
        let carrier = TokenCarrier::new(CarrierKind::Bearer, CookieConfig::default());

        let output = carrier.set(TOKEN);
        let token = output.token.unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        assert_eq!(carrier.get(&headers, None).as_deref(), Some(TOKEN));

        // Missing header after clear
        assert_eq!(carrier.get(&HeaderMap::new(), None), None);
    }

    #[test]
    fn test_bearer_rejects_other_schemes() {
        let carrier = TokenCarrier::new(CarrierKind::Bearer, CookieConfig::default());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert_eq!(carrier.get(&headers, None), None);
    }

    #[test]
    fn test_query_param_parsing() {
        assert_eq!(query_param_value("session=abc").as_deref(), Some("abc"));
        assert_eq!(
            query_param_value("a=1&session=abc&b=2").as_deref(),
            Some("abc")
        );
        assert_eq!(query_param_value("session="), None);
        assert_eq!(query_param_value("other=abc"), None);
        assert_eq!(query_param_value(""), None);
    }
}
