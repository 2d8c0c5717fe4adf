//! Cache store that never caches.

use async_trait::async_trait;

use super::CacheStore;
use crate::response::Response;

/// Always misses and discards every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCacheStore;

#[async_trait]
impl CacheStore for NullCacheStore {
    async fn get(&self, _identifier: &str) -> Option<Response> {
        None
    }

    fn put(&self, _identifier: &str, _response: Response, _ttl_seconds: u64) {}
}
