use std::net::IpAddr;

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use campus_domain::account::{AccountStatus, AdminRole};
use campus_domain::id::AccountId;

/// Back-office administrator account as the auth service sees it.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub status: AccountStatus,
    pub role: AdminRole,
    /// SMS destination for one-time codes.
    pub phone: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_login_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One-time login code as stored in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeCode {
    pub account_id: AccountId,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// Session token → account mapping as stored in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub account_id: AccountId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// Append-only audit record. Writes are best-effort.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub account_id: AccountId,
    pub action: &'static str,
    pub content: String,
    pub ip: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

pub mod audit_actions {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const PASSWORD_CHANGED: &str = "password_changed";
}

/// Where a request came from. Built once per request and passed down explicitly.
#[derive(Debug, Clone)]
pub struct RequestOrigin {
    pub ip: IpAddr,
    pub user_agent: String,
}

/// Identity resolved from a valid session token, scoped to one request.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub account_id: AccountId,
    pub username: String,
    pub role: AdminRole,
    pub token: String,
}

/// Tunables for the login flow.
#[derive(Debug, Clone)]
pub struct LoginPolicy {
    /// Source addresses that never need a one-time code.
    pub ip_allowlist: Vec<IpAddr>,
    /// Failed attempts per address at which a one-time code becomes mandatory.
    pub failure_threshold: u64,
    /// Lifetime of a failed-attempt counter, from its first increment.
    pub failure_window_secs: u64,
    pub code_ttl_secs: u64,
    /// Minimum gap before another code is sent while one is still valid.
    pub code_resend_secs: u64,
    pub session_ttl_secs: u64,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            ip_allowlist: Vec::new(),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            failure_window_secs: DEFAULT_FAILURE_WINDOW_SECS,
            code_ttl_secs: DEFAULT_CODE_TTL_SECS,
            code_resend_secs: DEFAULT_CODE_RESEND_SECS,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

pub const DEFAULT_FAILURE_THRESHOLD: u64 = 3;

pub const DEFAULT_FAILURE_WINDOW_SECS: u64 = 3600;

/// One-time code lifetime (5 minutes).
pub const DEFAULT_CODE_TTL_SECS: u64 = 300;

pub const DEFAULT_CODE_RESEND_SECS: u64 = 60;

/// Session lifetime (2 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7200;

/// Number of digits in a one-time code.
pub const CODE_DIGITS: usize = 6;

/// Upper bound for any configured lifetime (30 days).
pub const MAX_TTL_SECS: u64 = 30 * 24 * 3600;

/// Lifetime as a chrono duration. Out-of-range values are an error, never a panic or a wrap.
pub fn ttl_duration(secs: u64) -> anyhow::Result<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| anyhow!("lifetime of {secs}s is out of range"))
}
