//! Response cache stores.
//!
//! A cache store maps a request's cache identifier to a previously delivered
//! response. Stores are best-effort and non-durable: entries expire after
//! their TTL and are evicted lazily when read.

mod memory;
mod null;

use async_trait::async_trait;

use crate::response::Response;

pub use memory::InMemoryCacheStore;
pub use null::NullCacheStore;

/// Key/value store of cached responses.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the live response stored under `identifier`, if any.
    ///
    /// An expired entry is evicted and reported as a miss.
    async fn get(&self, identifier: &str) -> Option<Response>;

    /// Stores `response` under `identifier` for `ttl_seconds`.
    ///
    /// A TTL of zero stores an entry that is already expired.
    fn put(&self, identifier: &str, response: Response, ttl_seconds: u64);
}
