#![allow(async_fn_in_trait)]

use campus_domain::id::AccountId;

use crate::domain::types::{Account, AuditEntry};
use crate::error::AuthServiceError;

/// Persistence port for accounts.
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthServiceError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AuthServiceError>;

    /// Insert or fully overwrite an account.
    async fn save(&self, account: &Account) -> Result<(), AuthServiceError>;

    /// Stamp last-login time and address.
    async fn record_login(&self, id: AccountId, ip: &str) -> Result<(), AuthServiceError>;
}

/// Append-only audit sink. Callers treat failures as non-fatal.
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuthServiceError>;
}

/// Out-of-band delivery of one-time codes.
pub trait SmsGateway: Send + Sync {
    async fn send(&self, destination: &str, code: &str) -> Result<(), AuthServiceError>;
}

/// Expiring key-value store backing counters, codes and sessions (Redis in production).
pub trait KvStore: Send + Sync {
    async fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<(), AuthServiceError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AuthServiceError>;

    async fn delete(&self, key: &str) -> Result<(), AuthServiceError>;

    /// Increment a counter, creating it at 1 with `ttl_secs` if absent.
    /// The TTL is only set on creation, so the window runs from the first increment.
    async fn incr(&self, key: &str, ttl_secs: u64) -> Result<u64, AuthServiceError>;
}
