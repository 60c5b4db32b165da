use anyhow::Context as _;
use chrono::{DateTime, Utc};
use rand::RngExt;
use tracing::{info, warn};

use campus_domain::id::AccountId;

use crate::domain::repository::{KvStore, SmsGateway};
use crate::domain::types::{Account, CODE_DIGITS, LoginPolicy, OneTimeCode, ttl_duration};
use crate::error::AuthServiceError;

/// Wrong guesses allowed against one issued code before it is burned.
pub const MAX_CODE_ATTEMPTS: u64 = 5;

pub fn code_key(account_id: AccountId) -> String {
    format!("login_code:{account_id}")
}

fn attempts_key(account_id: AccountId) -> String {
    format!("login_code_attempts:{account_id}")
}

/// When the last code was delivered. Outlives the code itself, so burning a
/// code does not reopen the resend window.
pub fn resend_key(account_id: AccountId) -> String {
    format!("login_code_sent:{account_id}")
}

/// Uniformly random, zero-padded 6-digit code.
pub fn generate_code() -> String {
    let max = 10u32.pow(CODE_DIGITS as u32);
    let n = rand::rng().random_range(0..max);
    format!("{n:0width$}", width = CODE_DIGITS)
}

/// Compare without short-circuiting on the first differing byte.
fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.len() == submitted.len()
        && stored
            .bytes()
            .zip(submitted.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

pub async fn load_code<K: KvStore>(
    kv: &K,
    account_id: AccountId,
) -> Result<Option<OneTimeCode>, AuthServiceError> {
    let Some(raw) = kv.get(&code_key(account_id)).await? else {
        return Ok(None);
    };
    let code = serde_json::from_slice(&raw).context("decode one-time code")?;
    Ok(Some(code))
}

#[derive(Debug, PartialEq, Eq)]
pub enum CodeIssue {
    Sent,
    /// A code went out less than the resend interval ago (even if it has since
    /// been used up or burned); nothing new was dispatched.
    AlreadySent,
}

pub struct CodeIssuer<'a, K: KvStore, S: SmsGateway> {
    pub kv: &'a K,
    pub sms: &'a S,
    pub policy: &'a LoginPolicy,
}

impl<K: KvStore, S: SmsGateway> CodeIssuer<'_, K, S> {
    pub async fn issue(&self, account: &Account) -> Result<CodeIssue, AuthServiceError> {
        let Some(phone) = account.phone.as_deref() else {
            warn!(account_id = %account.id, "step-up required but account has no phone");
            return Err(AuthServiceError::DeliveryFailure);
        };

        let now = Utc::now();
        if let Some(last_sent) = self.last_sent(account.id).await? {
            if last_sent + ttl_duration(self.policy.code_resend_secs)? > now {
                return Ok(CodeIssue::AlreadySent);
            }
        }

        let record = OneTimeCode {
            account_id: account.id,
            code: generate_code(),
            issued_at: now,
            expires_at: now + ttl_duration(self.policy.code_ttl_secs)?,
        };
        let bytes = serde_json::to_vec(&record).context("encode one-time code")?;
        let key = code_key(account.id);
        self.kv.set(&key, &bytes, self.policy.code_ttl_secs).await?;
        self.kv.delete(&attempts_key(account.id)).await?;

        if let Err(e) = self.sms.send(phone, &record.code).await {
            warn!(account_id = %account.id, error = %e, "one-time code delivery failed");
            // An undelivered code must not block an immediate retry.
            self.kv.delete(&key).await?;
            return Err(AuthServiceError::DeliveryFailure);
        }

        if self.policy.code_resend_secs > 0 {
            let sent_at = serde_json::to_vec(&now).context("encode resend marker")?;
            self.kv
                .set(&resend_key(account.id), &sent_at, self.policy.code_resend_secs)
                .await?;
        }

        info!(account_id = %account.id, "one-time code sent");
        Ok(CodeIssue::Sent)
    }

    async fn last_sent(&self, account_id: AccountId) -> Result<Option<DateTime<Utc>>, AuthServiceError> {
        let Some(raw) = self.kv.get(&resend_key(account_id)).await? else {
            return Ok(None);
        };
        let sent_at = serde_json::from_slice(&raw).context("decode resend marker")?;
        Ok(Some(sent_at))
    }
}

pub struct CodeVerifier<'a, K: KvStore> {
    pub kv: &'a K,
    pub policy: &'a LoginPolicy,
}

impl<K: KvStore> CodeVerifier<'_, K> {
    /// Accepts a code at most once, only for the account it was issued to and only before expiry.
    pub async fn verify(&self, account_id: AccountId, submitted: &str) -> Result<(), AuthServiceError> {
        let key = code_key(account_id);
        let record = load_code(self.kv, account_id)
            .await?
            .ok_or(AuthServiceError::CodeMismatch)?;

        if record.account_id != account_id || !record.is_valid() {
            self.kv.delete(&key).await?;
            return Err(AuthServiceError::CodeMismatch);
        }

        if !codes_match(&record.code, submitted.trim()) {
            let attempts = self
                .kv
                .incr(&attempts_key(account_id), self.policy.code_ttl_secs)
                .await?;
            if attempts >= MAX_CODE_ATTEMPTS {
                warn!(%account_id, attempts, "one-time code burned after repeated mismatches");
                self.kv.delete(&key).await?;
                self.kv.delete(&attempts_key(account_id)).await?;
            }
            return Err(AuthServiceError::CodeMismatch);
        }

        self.kv.delete(&key).await?;
        self.kv.delete(&attempts_key(account_id)).await?;
        Ok(())
    }
}
