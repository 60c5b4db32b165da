//! Cookie builders for the session token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name carrying the session token.
pub const CAMPUS_SESSION: &str = "campus_session";

/// Set the session cookie. `max_age_secs` should equal the session TTL so the
/// browser drops the cookie when the server-side mapping expires.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use campus_auth_types::cookie::{set_session_cookie, CAMPUS_SESSION};
///
/// let jar = set_session_cookie(CookieJar::new(), "tok".to_string(), "example.edu".to_string(), 7200);
/// let cookie = jar.get(CAMPUS_SESSION).unwrap();
/// assert_eq!(cookie.value(), "tok");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.edu"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(7200)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(
    jar: CookieJar,
    value: String,
    domain: String,
    max_age_secs: u64,
) -> CookieJar {
    jar.add(session_cookie(
        value,
        domain,
        Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX)),
    ))
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use campus_auth_types::cookie::{clear_session_cookie, set_session_cookie, CAMPUS_SESSION};
///
/// let jar = set_session_cookie(CookieJar::new(), "tok".to_string(), "example.edu".to_string(), 7200);
/// let jar = clear_session_cookie(jar, "example.edu".to_string());
/// let cookie = jar.get(CAMPUS_SESSION).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    jar.add(session_cookie(String::new(), domain, Duration::ZERO))
}

fn session_cookie(value: String, domain: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((CAMPUS_SESSION, value))
        .path("/")
        .domain(domain)
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}
