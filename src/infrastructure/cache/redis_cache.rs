//! Redis-backed resolve cache.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "mapping:";

/// Caches `code -> original_url` under `mapping:{code}` keys with a TTL.
///
/// Only [`RedisCache::connect`] can fail. Once connected every operation is
/// fail-open: Redis errors are logged and reported as a miss or a no-op, so a
/// flaky cache never turns a resolvable code into an error.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

fn connection_error(context: &str, err: RedisError) -> CacheError {
    CacheError::ConnectionError(format!("{context}: {err}"))
}

fn key(code: &str) -> String {
    format!("{KEY_PREFIX}{code}")
}

impl RedisCache {
    /// Opens a managed connection and verifies it with `PING`.
    ///
    /// `default_ttl_seconds` applies whenever
    /// [`CacheService::set_original_url`] is called without a TTL.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| connection_error("Invalid Redis URL", e))?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| connection_error("Failed to connect to Redis", e))?;
        conn.ping::<()>()
            .await
            .map_err(|e| connection_error("Redis PING failed", e))?;

        info!(default_ttl_seconds, "Connected to Redis");

        Ok(Self {
            conn,
            default_ttl: default_ttl_seconds,
        })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_original_url(&self, code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let cached = conn
            .get::<_, Option<String>>(key(code))
            .await
            .unwrap_or_else(|e| {
                warn!(code, error = %e, "Redis GET failed");
                None
            });
        Ok(cached)
    }

    async fn set_original_url(
        &self,
        code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl_seconds = ttl_seconds.unwrap_or(self.default_ttl);
        let mut conn = self.conn.clone();

        match conn
            .set_ex::<_, _, ()>(key(code), original_url, ttl_seconds)
            .await
        {
            Ok(()) => debug!(code, ttl_seconds, "Cached mapping"),
            Err(e) => warn!(code, error = %e, "Redis SET failed"),
        }
        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        match conn.del::<_, u32>(key(code)).await {
            Ok(0) => {}
            Ok(_) => debug!(code, "Evicted cached mapping"),
            Err(e) => warn!(code, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
