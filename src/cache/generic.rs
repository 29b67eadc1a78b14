//! Generic TTL cache with sweep-only expiry.
//!
//! Modeled on the concurrent-`HashMap` backend shape, but `get` never
//! deletes an expired entry itself: only [`GenericCache::cleanup`] does.
//! This keeps the read path a shared-lock-only operation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// A thread-safe string-keyed cache with a default TTL and per-entry overrides.
///
/// `V` is fixed at construction (via the generic parameter), so each
/// instantiation is a closed, single-type cache rather than a runtime
/// type-erased store; [`crate::cache::typed`] builds the named caches the
/// rest of the crate uses on top of this.
pub struct GenericCache<V: Clone + Send + Sync> {
    map: RwLock<HashMap<String, Entry<V>>>,
    default_ttl: Duration,
    name: &'static str,
}

impl<V: Clone + Send + Sync> GenericCache<V> {
    #[must_use]
    pub fn new(name: &'static str, default_ttl: Duration) -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
            default_ttl,
            name,
        }
    }

    /// Returns the value for `key` if present and not expired. An expired
    /// entry is reported as absent but left in place for the sweeper.
    pub async fn get(&self, key: &str) -> Option<V> {
        let map = self.map.read().await;
        match map.get(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => Some(entry.value.clone()),
            _ => None,
        }
    }

    pub async fn has(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    pub async fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.map.write().await.insert(key, entry);
    }

    pub async fn delete(&self, key: &str) {
        self.map.write().await.remove(key);
    }

    /// Deletes every key whose raw string starts with `prefix`.
    pub async fn delete_by_prefix(&self, prefix: &str) -> usize {
        let mut map = self.map.write().await;
        let before = map.len();
        map.retain(|k, _| !k.starts_with(prefix));
        before - map.len()
    }

    /// Number of entries, including expired ones not yet swept.
    pub async fn size(&self) -> usize {
        self.map.read().await.len()
    }

    pub async fn clear(&self) {
        self.map.write().await.clear();
    }

    /// Removes every entry whose expiry has passed. Safe to call concurrently
    /// with readers/writers; takes the exclusive lock for one pass.
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut map = self.map.write().await;
        let before = map.len();
        map.retain(|_, entry| !entry.is_expired(now));
        let removed = before - map.len();
        if removed > 0 {
            debug!(cache = self.name, removed, "swept expired entries");
        }
        removed
    }
}

/// Spawns a periodic sweeper for `cache`. The returned handle is retained by
/// callers that want to abort it on shutdown; the cache itself has no stop
/// signal wired in.
pub fn spawn_cleanup<V>(
    cache: std::sync::Arc<GenericCache<V>>,
    interval: Duration,
) -> tokio::task::JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            cache.cleanup().await;
        }
    })
}
