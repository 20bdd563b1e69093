//! Cryptographic Utilities

use rand::{RngCore, rngs::OsRng};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a random token encoded as lowercase hex
///
/// `entropy_bytes` bytes from the OS CSPRNG, so the returned string is
/// `entropy_bytes * 2` characters long.
pub fn random_token_hex(entropy_bytes: usize) -> String {
    hex::encode(random_bytes(entropy_bytes))
}

/// Check whether a string is entirely lowercase hex
pub fn is_lower_hex(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
