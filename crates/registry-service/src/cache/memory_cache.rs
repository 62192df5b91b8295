//! In-process cache with per-entry expiry.

use super::CacheInterface;
use async_trait::async_trait;
use registry_core::RegistryResult;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// In-memory cache used when Redis is disabled.
///
/// Expired entries read as absent. They are dropped when read and swept on
/// every write, so keys that are never read again do not accumulate.
/// Uses the tokio clock so tests can drive expiry with a paused runtime.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> RegistryResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((value, expires_at)) if *expires_at > now => {
                    debug!("Cache hit for key '{}'", key);
                    return Ok(Some(value.clone()));
                }
                None => {
                    debug!("Cache miss for key '{}'", key);
                    return Ok(None);
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|(_, expires_at)| *expires_at <= now) {
            entries.remove(key);
        }
        debug!("Cache entry for key '{}' expired", key);
        Ok(None)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RegistryResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        debug!("Cached key '{}' with TTL {}s", key, ttl.as_secs());
        Ok(())
    }
}
