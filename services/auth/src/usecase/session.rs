use anyhow::Context as _;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use campus_auth_types::token::{generate_session_token, is_well_formed};

use crate::domain::repository::{AccountStore, AuditSink, KvStore};
use crate::domain::types::{
    Account, CurrentAccount, LoginPolicy, RequestOrigin, SessionRecord, audit_actions,
    ttl_duration,
};
use crate::error::AuthServiceError;
use crate::usecase::audit::record_best_effort;

pub fn session_key(token: &str) -> String {
    format!("session:{token}")
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// ── SessionIssuer ─────────────────────────────────────────────────────────────

pub struct SessionIssuer<'a, A: AccountStore, K: KvStore, L: AuditSink> {
    pub accounts: &'a A,
    pub kv: &'a K,
    pub audit: &'a L,
    pub policy: &'a LoginPolicy,
}

impl<A: AccountStore, K: KvStore, L: AuditSink> SessionIssuer<'_, A, K, L> {
    pub async fn issue(
        &self,
        account: &Account,
        origin: &RequestOrigin,
    ) -> Result<IssuedSession, AuthServiceError> {
        let token = generate_session_token();
        let now = Utc::now();
        let record = SessionRecord {
            account_id: account.id,
            issued_at: now,
            expires_at: now + ttl_duration(self.policy.session_ttl_secs)?,
        };
        let bytes = serde_json::to_vec(&record).context("encode session")?;

        let ip = origin.ip.to_string();
        self.accounts.record_login(account.id, &ip).await?;
        self.kv
            .set(&session_key(&token), &bytes, self.policy.session_ttl_secs)
            .await?;

        record_best_effort(
            self.audit,
            account.id,
            audit_actions::LOGIN,
            format!("{} signed in", account.username),
            origin,
        )
        .await;

        info!(account_id = %account.id, %ip, "session issued");
        Ok(IssuedSession {
            token,
            expires_at: record.expires_at,
        })
    }
}

// ── SessionResolver ───────────────────────────────────────────────────────────

pub struct SessionResolver<'a, A: AccountStore, K: KvStore> {
    pub accounts: &'a A,
    pub kv: &'a K,
}

impl<A: AccountStore, K: KvStore> SessionResolver<'_, A, K> {
    pub async fn resolve(&self, token: &str) -> Result<CurrentAccount, AuthServiceError> {
        if !is_well_formed(token) {
            return Err(AuthServiceError::InvalidSession);
        }

        let key = session_key(token);
        let raw = self
            .kv
            .get(&key)
            .await?
            .ok_or(AuthServiceError::InvalidSession)?;
        let record: SessionRecord = serde_json::from_slice(&raw).context("decode session")?;

        if !record.is_valid() {
            self.kv.delete(&key).await?;
            return Err(AuthServiceError::InvalidSession);
        }

        let account = self
            .accounts
            .find_by_id(record.account_id)
            .await?
            .ok_or(AuthServiceError::InvalidSession)?;
        if !account.status.is_active() {
            warn!(account_id = %account.id, "session presented for disabled account");
            return Err(AuthServiceError::InvalidSession);
        }

        Ok(CurrentAccount {
            account_id: account.id,
            username: account.username,
            role: account.role,
            token: token.to_owned(),
        })
    }
}

// ── Logout ────────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<K: KvStore, L: AuditSink> {
    pub kv: K,
    pub audit: L,
}

impl<K: KvStore, L: AuditSink> LogoutUseCase<K, L> {
    pub async fn execute(
        &self,
        current: &CurrentAccount,
        origin: &RequestOrigin,
    ) -> Result<(), AuthServiceError> {
        self.kv.delete(&session_key(&current.token)).await?;
        record_best_effort(
            &self.audit,
            current.account_id,
            audit_actions::LOGOUT,
            format!("{} signed out", current.username),
            origin,
        )
        .await;
        Ok(())
    }
}
