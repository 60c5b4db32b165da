use std::sync::Arc;

use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::domain::types::LoginPolicy;
use crate::infra::cache::RedisKvStore;
use crate::infra::db::{DbAccountStore, DbAuditSink};
use crate::infra::sms::SmsClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub sms: SmsClient,
    pub cookie_domain: String,
    pub trust_forwarded_for: bool,
    pub login: Arc<LoginPolicy>,
}

impl AppState {
    pub fn account_store(&self) -> DbAccountStore {
        DbAccountStore {
            db: self.db.clone(),
        }
    }

    pub fn audit_sink(&self) -> DbAuditSink {
        DbAuditSink {
            db: self.db.clone(),
        }
    }

    pub fn kv_store(&self) -> RedisKvStore {
        RedisKvStore {
            pool: self.redis.clone(),
        }
    }
}
