//! In-memory cache store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::CacheStore;
use crate::response::Response;

struct CacheEntry {
    response: Response,
    // None when the TTL reaches past the clock's range
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Process-local cache with per-entry expiration.
///
/// Expiry is measured on the Tokio clock, so paused-time tests can advance
/// past a TTL without sleeping.
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, identifier: &str) -> Option<Response> {
        let now = Instant::now();
        let mut entries = self.entries();
        match entries.get(identifier) {
            Some(entry) if entry.is_expired(now) => {
                log::debug!("Evicting expired cache entry {}", identifier);
                entries.remove(identifier);
                None
            }
            Some(entry) => Some(entry.response.clone()),
            None => None,
        }
    }

    fn put(&self, identifier: &str, response: Response, ttl_seconds: u64) {
        let expires_at = Instant::now().checked_add(Duration::from_secs(ttl_seconds));
        self.entries().insert(
            identifier.to_string(),
            CacheEntry {
                response,
                expires_at,
            },
        );
    }
}
