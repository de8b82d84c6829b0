//! Process-local read-through cache with a TTL per entry.
//!
//! Keys live under a single namespace so that every query result can be
//! dropped at once after a write. Expired entries are never returned. Reading
//! one evicts it; the rest go with moka's housekeeping rather than a sweeper.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use moka::future::Cache;
use moka::Expiry;
use serde::Serialize;
use tracing::warn;

/// Prefix shared by every key produced by [`build_key`]
pub const KEY_NAMESPACE: &str = "meal:";
const KEY_SEPARATOR: &str = "|";

#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Each entry carries its own TTL; overwriting restarts the clock.
struct PerEntryTtl;

impl<V> Expiry<String, Entry<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Generic string-keyed cache with lazy expiry
pub struct TtlCache<V> {
    inner: Cache<String, Entry<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .support_invalidation_closures()
            .build();

        Self {
            inner,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a live entry. An expired entry reads as absent and is evicted.
    pub async fn get(&self, key: &str) -> Option<V> {
        match self.inner.get(key).await {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                // moka hides expired entries but keeps them until its timer wheel advances
                self.inner.invalidate(key).await;
                None
            }
        }
    }

    /// Insert or overwrite `key`, expiring `ttl` from now
    pub async fn set(&self, key: String, value: V, ttl: Duration) {
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    /// Evict every key starting with `prefix`.
    ///
    /// A prefix without the namespace tag (optionally with a leading `/`) is
    /// namespaced first, so `"query"` and `"meal:query"` are equivalent.
    pub fn clear_by_prefix(&self, prefix: &str) {
        let normalized = normalize_prefix(prefix);
        if let Err(e) = self
            .inner
            .invalidate_entries_if(move |key, _| key.starts_with(&normalized))
        {
            // Only possible when invalidation closures are disabled; drop everything instead.
            warn!(error = %e, "Prefix invalidation unavailable, clearing whole cache");
            self.inner.invalidate_all();
        }
    }

    /// Number of live entries after pending evictions have been applied
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entry_count().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Build a namespaced key from parts given in canonical order.
///
/// Parts are trimmed and lower-cased; empty parts are dropped.
pub fn build_key<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(|part| part.as_ref().trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR);
    format!("{KEY_NAMESPACE}{joined}")
}

fn normalize_prefix(prefix: &str) -> String {
    if prefix.starts_with(KEY_NAMESPACE) {
        prefix.to_string()
    } else {
        let bare = prefix.strip_prefix('/').unwrap_or(prefix);
        format!("{KEY_NAMESPACE}{bare}")
    }
}
