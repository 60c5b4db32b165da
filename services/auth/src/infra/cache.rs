use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, cmd};

use crate::domain::repository::KvStore;
use crate::error::AuthServiceError;

/// INCR, setting the TTL only when the key was just created, in one round trip.
const INCR_WITH_TTL: &str = r"
local n = redis.call('INCR', KEYS[1])
if n == 1 then
  redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return n
";

#[derive(Clone)]
pub struct RedisKvStore {
    pub pool: Pool,
}

impl RedisKvStore {
    async fn conn(&self) -> Result<deadpool_redis::Connection, AuthServiceError> {
        let conn = self.pool.get().await.context("redis pool checkout")?;
        Ok(conn)
    }

    /// Round-trip check used by the readiness probe.
    pub async fn ping(&self) -> Result<(), AuthServiceError> {
        let mut conn = self.conn().await?;
        let _: String = cmd("PING")
            .query_async(&mut conn)
            .await
            .context("redis ping")?;
        Ok(())
    }
}

impl KvStore for RedisKvStore {
    async fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<(), AuthServiceError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .set_ex(key, value.to_vec(), ttl_secs)
            .await
            .context("redis SET")?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AuthServiceError> {
        let mut conn = self.conn().await?;
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .context("redis GET")?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), AuthServiceError> {
        let mut conn = self.conn().await?;
        let _: u64 = conn
            .del(key)
            .await
            .context("redis DEL")?;
        Ok(())
    }

    async fn incr(&self, key: &str, ttl_secs: u64) -> Result<u64, AuthServiceError> {
        let mut conn = self.conn().await?;
        let n: u64 = cmd("EVAL")
            .arg(INCR_WITH_TTL)
            .arg(1)
            .arg(key)
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .context("redis INCR")?;
        Ok(n)
    }
}
