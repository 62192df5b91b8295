//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use registry_core::RegistryResult;
use std::time::Duration;

/// Key/value store with per-entry expiry.
///
/// Uses JSON strings for type-erased storage to keep the trait
/// dyn-compatible. Expiry is enforced by the implementation: an expired
/// entry must read as absent.
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> RegistryResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL, replacing any previous entry.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RegistryResult<()>;
}

/// Typed helpers over [`CacheInterface`].
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    ///
    /// A stored value that no longer deserializes into `T` is an error.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> RegistryResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> RegistryResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
