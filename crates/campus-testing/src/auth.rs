//! Request headers for exercising session-aware code without a running login flow.

use http::{HeaderMap, HeaderName, HeaderValue, header};

use campus_auth_types::cookie::CAMPUS_SESSION;
use campus_auth_types::token::generate_session_token;

/// A session token as a client would present it.
pub struct MockSession {
    pub token: String,
}

impl MockSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// A well-formed token that no store knows about.
    pub fn random() -> Self {
        Self::new(generate_session_token())
    }

    /// `Authorization: Bearer <token>`.
    pub fn bearer_headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token)).unwrap(),
        );
        map
    }

    /// `Cookie: campus_session=<token>`.
    pub fn cookie_headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{CAMPUS_SESSION}={}", self.token)).unwrap(),
        );
        map
    }
}

/// Headers as a reverse proxy would set them for `client`.
pub fn forwarded_for(client: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(
        HeaderName::from_static("x-forwarded-for"),
        HeaderValue::from_str(&format!("{client}, 10.0.0.1")).unwrap(),
    );
    map.insert(
        header::USER_AGENT,
        HeaderValue::from_static("campus-testing/0.1"),
    );
    map
}
