//! Read-through lookup cache.

use super::{CacheExt, CacheInterface};
use registry_core::RegistryResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Results that may be stored by [`LookupCache`].
///
/// Absent results are never cached so that a later insert becomes visible
/// to the next lookup.
pub trait CacheValue {
    /// Whether the result carries data worth caching.
    fn is_present(&self) -> bool;
}

impl<T> CacheValue for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl<T> CacheValue for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

/// Read-through cache with a fixed TTL and no invalidation.
///
/// The cache is best-effort: read failures count as misses and write
/// failures are logged, neither fails the lookup.
#[derive(Clone)]
pub struct LookupCache {
    cache: Arc<dyn CacheInterface>,
    ttl: Duration,
}

impl LookupCache {
    /// Creates a lookup cache over `cache` with entries living for `ttl`.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Entry time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the entry under `key`, or runs `fallback` and caches a present result.
    ///
    /// Concurrent misses on one key may each run `fallback`; the last write wins.
    pub async fn get_cached<T, F, Fut>(&self, key: &str, fallback: F) -> RegistryResult<T>
    where
        T: Serialize + DeserializeOwned + CacheValue + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = RegistryResult<T>> + Send,
    {
        match self.cache.get::<T>(key).await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => warn!("Cache read for key '{}' failed, falling back to store: {}", key, e),
        }

        let value = fallback().await?;

        if value.is_present() {
            if let Err(e) = self.cache.set(key, &value, self.ttl).await {
                warn!("Cache write for key '{}' failed: {}", key, e);
            }
        } else {
            debug!("Not caching empty result for key '{}'", key);
        }

        Ok(value)
    }
}

impl std::fmt::Debug for LookupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
