use anyhow::Context as _;

use crate::domain::repository::AccountStore;
use crate::domain::types::Account;
use crate::error::AuthServiceError;
use crate::password::verify_password;

/// Verify a password against a stored hash off the async runtime (Argon2 is CPU-bound).
pub async fn verify_off_thread(password: &str, hash: &str) -> Result<bool, AuthServiceError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("password verification task")??;
    Ok(ok)
}

pub struct CredentialCheck<'a, A: AccountStore> {
    pub accounts: &'a A,
}

impl<A: AccountStore> CredentialCheck<'_, A> {
    /// Password is checked before status, so a disabled account with a wrong
    /// password reports `InvalidCredentials`, and never passes either way.
    pub async fn check(&self, username: &str, password: &str) -> Result<Account, AuthServiceError> {
        let account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !verify_off_thread(password, &account.password_hash).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if !account.status.is_active() {
            return Err(AuthServiceError::Disabled);
        }

        Ok(account)
    }
}
