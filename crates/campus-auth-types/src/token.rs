//! Opaque session-token format.
//!
//! Tokens carry no claims: they are random lookup keys resolved by the auth
//! service. Other consumers only check the shape before forwarding.

/// Number of characters in a session token.
pub const SESSION_TOKEN_LEN: usize = 48;

/// Token alphabet (ASCII alphanumerics, ~5.95 bits per character).
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Cheap syntactic check run before any store lookup.
///
/// ```
/// use campus_auth_types::token::is_well_formed;
///
/// assert!(is_well_formed(&"a".repeat(48)));
/// assert!(!is_well_formed("short"));
/// assert!(!is_well_formed(&"-".repeat(48)));
/// ```
pub fn is_well_formed(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LEN && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Mint a new session token from the thread-local CSPRNG.
///
/// Requires the `USE_ONLY_IN_AUTH_SERVICE` feature: only the auth service issues sessions.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn generate_session_token() -> String {
    use rand::RngExt;

    let mut rng = rand::rng();
    (0..SESSION_TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
