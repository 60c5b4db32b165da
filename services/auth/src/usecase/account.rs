use anyhow::Context as _;
use chrono::Utc;
use tracing::info;

use campus_domain::account::{
    AccountStatus, AdminRole, validate_password, validate_phone, validate_username,
};
use campus_domain::id::AccountId;

use crate::domain::repository::{AccountStore, AuditSink};
use crate::domain::types::{Account, CurrentAccount, RequestOrigin, audit_actions};
use crate::error::AuthServiceError;
use crate::password::hash_password;
use crate::usecase::audit::record_best_effort;
use crate::usecase::credential::verify_off_thread;

async fn hash_off_thread(password: &str) -> Result<String, AuthServiceError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task")??;
    Ok(hash)
}

// ── ProvisionAccount ──────────────────────────────────────────────────────────

pub struct ProvisionAccountInput {
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: AdminRole,
}

pub struct ProvisionAccountUseCase<A: AccountStore> {
    pub accounts: A,
}

impl<A: AccountStore> ProvisionAccountUseCase<A> {
    pub async fn execute(&self, input: ProvisionAccountInput) -> Result<Account, AuthServiceError> {
        validate_username(&input.username)?;
        validate_password(&input.password)?;
        if let Some(phone) = input.phone.as_deref() {
            validate_phone(phone)?;
        }

        if self
            .accounts
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AuthServiceError::AccountExists);
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::generate(),
            username: input.username,
            password_hash: hash_off_thread(&input.password).await?,
            status: AccountStatus::Active,
            role: input.role,
            phone: input.phone,
            last_login_at: None,
            last_login_ip: None,
            created_at: now,
            updated_at: now,
        };
        self.accounts.save(&account).await?;
        info!(account_id = %account.id, username = %account.username, "account provisioned");
        Ok(account)
    }
}

// ── SetAccountStatus ──────────────────────────────────────────────────────────

pub struct SetAccountStatusUseCase<A: AccountStore> {
    pub accounts: A,
}

impl<A: AccountStore> SetAccountStatusUseCase<A> {
    /// Returns the updated account. Setting the current status again is a no-op.
    pub async fn execute(
        &self,
        username: &str,
        status: AccountStatus,
    ) -> Result<Account, AuthServiceError> {
        let mut account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(AuthServiceError::NotFound)?;
        if account.status == status {
            return Ok(account);
        }
        account.status = status;
        account.updated_at = Utc::now();
        self.accounts.save(&account).await?;
        info!(account_id = %account.id, ?status, "account status changed");
        Ok(account)
    }
}

// ── ChangePassword ────────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<A: AccountStore, L: AuditSink> {
    pub accounts: A,
    pub audit: L,
}

impl<A: AccountStore, L: AuditSink> ChangePasswordUseCase<A, L> {
    pub async fn execute(
        &self,
        current: &CurrentAccount,
        input: ChangePasswordInput,
        origin: &RequestOrigin,
    ) -> Result<(), AuthServiceError> {
        let mut account = self
            .accounts
            .find_by_id(current.account_id)
            .await?
            .ok_or(AuthServiceError::InvalidSession)?;

        if !verify_off_thread(&input.current_password, &account.password_hash).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }
        validate_password(&input.new_password)?;

        account.password_hash = hash_off_thread(&input.new_password).await?;
        account.updated_at = Utc::now();
        self.accounts.save(&account).await?;

        record_best_effort(
            &self.audit,
            account.id,
            audit_actions::PASSWORD_CHANGED,
            format!("{} changed password", account.username),
            origin,
        )
        .await;
        Ok(())
    }
}
