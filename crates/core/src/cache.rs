//! TTL response cache.
//!
//! An explicit instance (not a process-wide singleton) injected into the
//! components that memoize upstream calls. Entries expire by TTL only;
//! every insert sweeps out the expired ones.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::metrics::CACHE_LOOKUPS;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Key to value mapping with per-entry expiry.
#[derive(Debug)]
pub struct ResponseCache<V> {
    name: &'static str,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> ResponseCache<V> {
    /// Create an empty cache. `name` labels metrics and logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the live value for `key`, or run `producer` and store its
    /// result until `now + ttl`.
    ///
    /// Only `Ok` values are stored. The lock is not held while `producer`
    /// runs, so concurrent misses for one key may each run it.
    pub async fn fetch_or_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            CACHE_LOOKUPS.with_label_values(&[self.name, "hit"]).inc();
            return Ok(value);
        }

        CACHE_LOOKUPS.with_label_values(&[self.name, "miss"]).inc();
        debug!(cache = self.name, key, "Cache miss");

        let value = producer().await?;

        let now = Instant::now();
        let mut entries = self.entries();
        let purged = Self::purge_expired(&mut entries, now);
        if purged > 0 {
            debug!(cache = self.name, purged, "Purged expired entries");
        }
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                expires_at: now + ttl,
            },
        );

        Ok(value)
    }

    /// Live value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries();
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Drop every expired entry. Returns how many were removed.
    fn purge_expired(entries: &mut HashMap<String, CacheEntry<V>>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
