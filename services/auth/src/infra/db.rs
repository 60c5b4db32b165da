use anyhow::{Context as _, anyhow};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr,
};
use uuid::Uuid;

use campus_auth_schema::{accounts, audit_logs};
use campus_domain::account::{AccountStatus, AdminRole};
use campus_domain::id::AccountId;

use crate::domain::repository::{AccountStore, AuditSink};
use crate::domain::types::{Account, AuditEntry};
use crate::error::AuthServiceError;

// ── Account store ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountStore {
    pub db: DatabaseConnection,
}

impl AccountStore for DbAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AuthServiceError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find account by username")?;
        model.map(account_from_model).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AuthServiceError> {
        let model = accounts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find account by id")?;
        model.map(account_from_model).transpose()
    }

    async fn save(&self, account: &Account) -> Result<(), AuthServiceError> {
        let model = accounts::ActiveModel {
            id: Set(account.id.0),
            username: Set(account.username.clone()),
            password_hash: Set(account.password_hash.clone()),
            status: Set(account.status.as_i16()),
            role: Set(i16::from(account.role.as_u8())),
            phone: Set(account.phone.clone()),
            last_login_at: Set(account.last_login_at),
            last_login_ip: Set(account.last_login_ip.clone()),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
        };
        let result = accounts::Entity::insert(model)
            .on_conflict(
                OnConflict::column(accounts::Column::Id)
                    .update_columns([
                        accounts::Column::Username,
                        accounts::Column::PasswordHash,
                        accounts::Column::Status,
                        accounts::Column::Role,
                        accounts::Column::Phone,
                        accounts::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await;
        match result {
            Ok(_) => Ok(()),
            // Username uniqueness is enforced by the table; a concurrent provision lands here.
            Err(e) if is_unique_violation(&e) => Err(AuthServiceError::AccountExists),
            Err(e) => Err(anyhow::Error::new(e).context("save account").into()),
        }
    }

    async fn record_login(&self, id: AccountId, ip: &str) -> Result<(), AuthServiceError> {
        accounts::ActiveModel {
            id: Set(id.0),
            last_login_at: Set(Some(Utc::now())),
            last_login_ip: Set(Some(ip.to_owned())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record account login")?;
        Ok(())
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn account_from_model(model: accounts::Model) -> Result<Account, AuthServiceError> {
    let status = AccountStatus::from_i16(model.status)
        .ok_or_else(|| anyhow!("account {} has unknown status {}", model.id, model.status))?;
    let role = u8::try_from(model.role)
        .ok()
        .and_then(AdminRole::from_u8)
        .ok_or_else(|| anyhow!("account {} has unknown role {}", model.id, model.role))?;
    Ok(Account {
        id: AccountId(model.id),
        username: model.username,
        password_hash: model.password_hash,
        status,
        role,
        phone: model.phone,
        last_login_at: model.last_login_at,
        last_login_ip: model.last_login_ip,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Audit sink ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuditSink {
    pub db: DatabaseConnection,
}

impl AuditSink for DbAuditSink {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuthServiceError> {
        audit_logs::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(entry.account_id.0),
            action: Set(entry.action.to_owned()),
            content: Set(entry.content.clone()),
            ip: Set(entry.ip.clone()),
            user_agent: Set(entry.user_agent.clone()),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("append audit log")?;
        Ok(())
    }
}
