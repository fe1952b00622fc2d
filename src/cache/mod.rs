//! Shared response cache for upstream-backed endpoints.
//!
//! # Responsibilities
//! - Hold successful upstream payloads keyed by normalized upstream URL
//! - Expire entries after a per-entry TTL
//! - Stay bounded: expired entries are purged first, then the entry
//!   closest to expiry is evicted
//!
//! # Design Decisions
//! - `Arc<DashMap>` so handlers share one cache without a global lock
//! - Expired entries are evicted lazily on lookup
//! - A miss is never an error; the cache is an optimization only

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

#[derive(Debug, Clone)]
struct Entry {
    body: Value,
    expires_at: Instant,
}

/// Thread-safe TTL cache of JSON response bodies.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    inner: Arc<DashMap<String, Entry>>,
    max_entries: usize,
}

impl ResponseCache {
    /// Create an empty cache holding at most `max_entries` bodies.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Fresh body for `key`, evicting it when expired.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        if let Some(entry) = self.inner.get(key) {
            if entry.expires_at > now {
                return Some(entry.body.clone());
            }
        }
        self.inner.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    /// Store `body` under `key` for `ttl`.
    pub fn insert(&self, key: String, body: Value, ttl: Duration) {
        if !self.inner.contains_key(&key) && self.inner.len() >= self.max_entries {
            self.purge_expired();
            if self.inner.len() >= self.max_entries {
                self.evict_soonest();
            }
        }
        self.inner.insert(
            key,
            Entry {
                body,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.inner.len())
    }

    fn evict_soonest(&self) {
        let soonest = self
            .inner
            .iter()
            .min_by_key(|entry| entry.expires_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = soonest {
            tracing::debug!(key = %key, "Response cache full, evicting");
            self.inner.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(1024)
    }
}
