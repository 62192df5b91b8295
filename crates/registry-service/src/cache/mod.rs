//! Caching infrastructure for the service layer.
//!
//! A dyn-compatible cache abstraction with Redis and in-process backends,
//! and the read-through [`LookupCache`] the gateway uses for reads.

mod cache_interface;
pub mod cache_keys;
mod lookup_cache;
mod memory_cache;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use lookup_cache::{CacheValue, LookupCache};
pub use memory_cache::InMemoryCache;
pub use redis_cache::{create_pool, RedisCacheService};
