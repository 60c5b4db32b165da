use std::net::IpAddr;
use std::str::FromStr;

use anyhow::{Context as _, bail};

use crate::domain::types::{LoginPolicy, MAX_TTL_SECS};

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// Cookie domain attribute (e.g. "admin.example.edu").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// Use the first `X-Forwarded-For` hop as the client address. Env var: `TRUST_FORWARDED_FOR`.
    pub trust_forwarded_for: bool,
    /// SMS gateway endpoint; codes are only logged as skipped when unset. Env var: `SMS_GATEWAY_URL`.
    pub sms_gateway_url: Option<String>,
    /// API key sent to the SMS gateway. Env var: `SMS_GATEWAY_API_KEY`.
    pub sms_gateway_api_key: Option<String>,
    pub login: LoginPolicy,
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = LoginPolicy::default();
        let login = LoginPolicy {
            ip_allowlist: parse_allowlist(&optional("LOGIN_IP_ALLOWLIST").unwrap_or_default())?,
            failure_threshold: parsed_or("LOGIN_FAILURE_THRESHOLD", defaults.failure_threshold)?,
            failure_window_secs: parsed_or(
                "LOGIN_FAILURE_WINDOW_SECS",
                defaults.failure_window_secs,
            )?,
            code_ttl_secs: parsed_or("LOGIN_CODE_TTL_SECS", defaults.code_ttl_secs)?,
            code_resend_secs: parsed_or("LOGIN_CODE_RESEND_SECS", defaults.code_resend_secs)?,
            session_ttl_secs: parsed_or("SESSION_TTL_SECS", defaults.session_ttl_secs)?,
        };
        check_policy(&login)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            cookie_domain: required("COOKIE_DOMAIN")?,
            auth_port: parsed_or("AUTH_PORT", 3112)?,
            trust_forwarded_for: parsed_or("TRUST_FORWARDED_FOR", false)?,
            sms_gateway_url: optional("SMS_GATEWAY_URL"),
            sms_gateway_api_key: optional("SMS_GATEWAY_API_KEY"),
            login,
        })
    }
}

/// Reject tunables that would break login at runtime rather than at startup.
pub fn check_policy(login: &LoginPolicy) -> anyhow::Result<()> {
    if login.failure_threshold == 0 {
        bail!("LOGIN_FAILURE_THRESHOLD must be at least 1");
    }
    for (key, secs) in [
        ("LOGIN_FAILURE_WINDOW_SECS", login.failure_window_secs),
        ("LOGIN_CODE_TTL_SECS", login.code_ttl_secs),
        ("SESSION_TTL_SECS", login.session_ttl_secs),
    ] {
        if !(1..=MAX_TTL_SECS).contains(&secs) {
            bail!("{key} must be between 1 and {MAX_TTL_SECS}, got {secs}");
        }
    }
    // 0 disables resend throttling.
    if login.code_resend_secs > login.code_ttl_secs {
        bail!(
            "LOGIN_CODE_RESEND_SECS ({}) must not exceed LOGIN_CODE_TTL_SECS ({})",
            login.code_resend_secs,
            login.code_ttl_secs
        );
    }
    Ok(())
}

fn required(key: &str) -> anyhow::Result<String> {
    optional(key).with_context(|| format!("{key} must be set"))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parsed_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} has invalid value {raw:?}")),
        None => Ok(default),
    }
}

/// Parse a comma-separated list of IP addresses. Blank entries are skipped.
pub fn parse_allowlist(raw: &str) -> anyhow::Result<Vec<IpAddr>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<IpAddr>()
                .with_context(|| format!("LOGIN_IP_ALLOWLIST entry {s:?} is not an IP address"))
        })
        .collect()
}
