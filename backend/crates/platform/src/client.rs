//! Client identification utilities
//!
//! Identifies the remote client for rate-limit keying. Sessions are
//! bound to their token alone, so nothing here feeds into auth
//! decisions.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract client IP address from headers
///
/// Checks the X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to the direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

/// Rate-limit key for an anonymous client
///
/// Falls back to a shared bucket when the IP cannot be determined, so
/// unidentifiable clients are throttled together rather than not at all.
pub fn client_key(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    match extract_client_ip(headers, direct_ip) {
        Some(ip) => ip.to_string(),
        None => "unknown".to_string(),
    }
}
