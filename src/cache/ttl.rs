use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-wide key/value cache with a per-entry expiry.
///
/// Expiry is checked lazily on lookup; there is no background sweeper and
/// no size bound. The lock is never held while a producer runs, so two
/// concurrent misses on the same key both compute and the last write wins.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone + Send + Sync> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value, or `None` if absent or expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_fresh(Instant::now()) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired. Drop it, unless it was refreshed while we waited for the write lock.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.is_fresh(Instant::now()) {
                return Some(entry.value.clone());
            }
            entries.remove(key);
            debug!(key, "cache entry expired");
        }
        None
    }

    /// Stores `value` until `now + ttl`. A zero TTL stores nothing.
    pub async fn set(&self, key: &str, value: V, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    pub async fn get_or_compute<F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        self.get_or_compute_with(key, |_| ttl, producer).await
    }

    /// Like `get_or_compute`, but the TTL is picked from the produced value.
    pub async fn get_or_compute_with<F, Fut, T>(&self, key: &str, ttl_for: T, producer: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
        T: FnOnce(&V) -> Duration,
    {
        if let Some(value) = self.get(key).await {
            debug!(key, "cache hit");
            return value;
        }

        debug!(key, "cache miss");
        let value = producer().await;
        let ttl = ttl_for(&value);
        self.set(key, value.clone(), ttl).await;
        value
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
