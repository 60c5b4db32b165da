//! Extraction of the session token a client presents.
//!
//! Only the token shape is checked here; resolving it to an account is the
//! auth service's job.

use axum_extra::extract::CookieJar;
use http::{HeaderMap, header};

use crate::cookie::CAMPUS_SESSION;
use crate::token::is_well_formed;

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_owned())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(CAMPUS_SESSION)
        .map(|c| c.value().to_owned())
}

/// The well-formed token a request carries: `Authorization: Bearer <token>`
/// first, then the `campus_session` cookie. A malformed bearer value falls
/// through to the cookie. `None` if neither is usable.
pub fn presented_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers)
        .filter(|t| is_well_formed(t))
        .or_else(|| cookie_token(headers).filter(|t| is_well_formed(t)))
}
