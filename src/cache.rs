//! Time-to-live response cache.
//!
//! Entries expire lazily: an expired entry stays in the map until the next
//! lookup of its key removes it. There is no capacity bound.

use std::collections::BTreeMap;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

/// Longest lifetime an entry can have. Larger TTLs are clamped to it.
pub const MAX_TTL: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

struct CacheEntry<V> {
    payload: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Entry counts reported by [`CacheStore::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

/// Keyed store of payloads with a per-entry time to live.
pub struct CacheStore<V> {
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V: Clone> CacheStore<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the payload for `key` if it has not expired.
    ///
    /// An expired entry is evicted as part of the lookup.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.payload.clone());
            }
        }

        // The read guard is gone; only evict if the entry is still stale so a
        // concurrent put is not lost.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            debug!("Evicted expired cache entry: {}", key);
        }
        None
    }

    /// Stores `payload` under `key` for `ttl`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, payload: V, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl.min(MAX_TTL))
            .unwrap_or(now);
        let entry = CacheEntry { payload, expires_at };
        self.entries.insert(key.into(), entry);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let total = self.entries.len();
        let expired = self
            .entries
            .iter()
            .filter(|entry| entry.is_expired(now))
            .count();

        CacheStats {
            total,
            active: total.saturating_sub(expired),
            expired,
        }
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the cache key for a request.
///
/// Parameters are ordered by name (then value), so the same set of
/// parameters always yields the same key whatever order it was built in.
pub fn cache_key<I, K, V>(endpoint: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: ToString,
{
    let mut pairs: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.to_string()))
        .collect();
    pairs.sort();

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{endpoint}?{query}")
}

/// Request parameters in key order.
pub type Params = BTreeMap<&'static str, String>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_ignores_insertion_order() {
        let a = cache_key("/mods/search", [("gameId", "432"), ("index", "0"), ("pageSize", "20")]);
        let b = cache_key("/mods/search", [("pageSize", "20"), ("gameId", "432"), ("index", "0")]);

        assert_eq!(a, b);
        assert_eq!(a, "/mods/search?gameId=432&index=0&pageSize=20");
    }

    #[test]
    fn key_distinguishes_values_and_endpoints() {
        let a = cache_key("/mods/1/files", [("gameVersion", "1.20.1")]);
        let b = cache_key("/mods/1/files", [("gameVersion", "1.19.2")]);
        let c = cache_key("/mods/2/files", [("gameVersion", "1.20.1")]);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(cache_key("/mods/1", Vec::<(&str, &str)>::new()), "/mods/1?");
    }

    #[tokio::test(start_paused = true)]
    async fn entry_is_present_within_ttl() {
        let cache = CacheStore::new();
        cache.put("k", 1u32, Duration::from_secs(60));

        assert_eq!(cache.get("k"), Some(1));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("k"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_expires_after_storage() {
        let cache = CacheStore::new();
        cache.put("k", "payload".to_string(), Duration::ZERO);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty(), "expired entry should be evicted on lookup");
    }

    #[tokio::test(start_paused = true)]
    async fn stats_count_expired_entries() {
        let cache = CacheStore::new();
        cache.put("short", 1u8, Duration::from_secs(1));
        cache.put("long", 2u8, Duration::from_secs(300));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(
            cache.stats(),
            CacheStats {
                total: 2,
                active: 1,
                expired: 1
            }
        );

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn huge_ttl_is_clamped() {
        let cache = CacheStore::new();
        cache.put("k", 1u8, Duration::from_secs(u64::MAX));

        tokio::time::advance(Duration::from_secs(10 * 365 * 24 * 60 * 60)).await;
        assert_eq!(cache.get("k"), Some(1));
        assert_eq!(cache.stats().active, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn put_replaces_existing_entry() {
        let cache = CacheStore::new();
        cache.put("k", 1u8, Duration::from_secs(1));
        cache.put("k", 2u8, Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }
}
