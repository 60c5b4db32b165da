use std::net::IpAddr;

use crate::domain::repository::KvStore;
use crate::domain::types::LoginPolicy;
use crate::error::AuthServiceError;

pub fn failure_key(ip: IpAddr) -> String {
    format!("login_failures:{ip}")
}

/// Decides whether a login from `ip` must be stepped up with a one-time code.
pub struct RiskGate<'a, K: KvStore> {
    pub kv: &'a K,
    pub policy: &'a LoginPolicy,
}

impl<K: KvStore> RiskGate<'_, K> {
    pub fn is_allowlisted(&self, ip: IpAddr) -> bool {
        self.policy.ip_allowlist.contains(&ip)
    }

    pub async fn failure_count(&self, ip: IpAddr) -> Result<u64, AuthServiceError> {
        let raw = self.kv.get(&failure_key(ip)).await?;
        Ok(raw
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0))
    }

    pub async fn requires_code(&self, ip: IpAddr) -> Result<bool, AuthServiceError> {
        if self.is_allowlisted(ip) {
            return Ok(false);
        }
        Ok(self.failure_count(ip).await? >= self.policy.failure_threshold)
    }

    /// Returns the count after incrementing.
    pub async fn record_failure(&self, ip: IpAddr) -> Result<u64, AuthServiceError> {
        self.kv
            .incr(&failure_key(ip), self.policy.failure_window_secs)
            .await
    }

    pub async fn clear(&self, ip: IpAddr) -> Result<(), AuthServiceError> {
        self.kv.delete(&failure_key(ip)).await
    }
}
