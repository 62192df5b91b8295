//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, PoolConfig, Runtime};
use registry_config::RedisConfig;
use registry_core::{RegistryError, RegistryResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Creates a Redis connection pool.
///
/// deadpool opens connections on demand, so this succeeds without a
/// reachable server; the first cache call makes the first connection.
pub fn create_pool(config: &RedisConfig) -> RegistryResult<Pool> {
    info!("Creating Redis pool for {}", config.url);
    let mut cfg = Config::from_url(&config.url);
    cfg.pool = Some(PoolConfig::new(config.pool_size));
    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| RegistryError::Cache(format!("Failed to create Redis pool: {}", e)))
}

/// Redis-based cache service.
#[derive(Clone)]
pub struct RedisCacheService {
    pool: Arc<Pool>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> RegistryResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| RegistryError::Cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get_raw(&self, key: &str) -> RegistryResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            RegistryError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RegistryResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            RegistryError::Cache(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisCacheService")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable() -> RedisConfig {
        RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            pool_size: 2,
            enabled: true,
        }
    }

    #[test]
    fn test_pool_creation_does_not_connect() {
        let pool = create_pool(&unreachable()).unwrap();
        assert_eq!(pool.status().size, 0);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = RedisConfig {
            url: "not-a-redis-url".to_string(),
            ..unreachable()
        };
        assert!(matches!(create_pool(&config), Err(RegistryError::Cache(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_surfaces_cache_error() {
        let cache = RedisCacheService::new(Arc::new(create_pool(&unreachable()).unwrap()));

        assert!(matches!(cache.get_raw("alice").await, Err(RegistryError::Cache(_))));
        assert!(matches!(
            cache.set_raw("alice", "{}", Duration::from_secs(60)).await,
            Err(RegistryError::Cache(_))
        ));
    }
}
