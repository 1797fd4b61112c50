//! Bounded, access-ordered cache with a staleness window.

use banca_config::CacheConfig;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// A single cache entry. Replaced wholesale on every insert, never mutated
/// in place apart from its recency bookkeeping.
#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    /// Monotonic access counter used for LRU victim selection. Instants can
    /// collide on consecutive calls; the sequence cannot.
    access_seq: u64,
    last_access: Instant,
    last_update: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, seq: u64) -> Self {
        let now = Instant::now();
        Self {
            value,
            access_seq: seq,
            last_access: now,
            last_update: now,
        }
    }

    fn touch(&mut self, seq: u64) {
        self.access_seq = seq;
        self.last_access = Instant::now();
    }

    fn is_stale(&self, window: Duration, now: Instant) -> bool {
        now.duration_since(self.last_update) >= window
    }
}

/// Something the background sweeper can drive.
pub trait Sweep: Send + Sync {
    /// Removes stale entries. Returns how many were evicted.
    fn sweep(&self) -> usize;
}

/// Bounded key/value cache with least-recently-used admission order and a
/// staleness window enforced by [`sweep`](ResolveCache::sweep).
///
/// The backing map is striped over several shards so traffic on different
/// keys does not contend on a single lock; structural changes on the same
/// key are mutually exclusive.
///
/// Invariants:
/// - the cache never holds more than `max_entries` entries; insertion
///   beyond capacity evicts the entry with the oldest access among those
///   present immediately before the eviction;
/// - an entry whose last write is older than the staleness window is
///   removed by the next sweep; a `get` refreshes access recency only,
///   not write freshness.
pub struct ResolveCache<K, V> {
    shards: Vec<Mutex<HashMap<K, CacheEntry<V>>>>,
    len: AtomicUsize,
    clock: AtomicU64,
    max_entries: usize,
    staleness_window: Duration,
}

impl<K, V> ResolveCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a cache from configuration.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let shard_count = config.shards.max(1);
        let mut shards = Vec::with_capacity(shard_count);
        for _ in 0..shard_count {
            shards.push(Mutex::new(HashMap::new()));
        }
        Self {
            shards,
            len: AtomicUsize::new(0),
            clock: AtomicU64::new(0),
            max_entries: config.max_entries.max(1),
            staleness_window: config.staleness_window(),
        }
    }

    fn shard_index(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    fn next_seq(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Inserts or replaces the entry for `key`, resetting both its access
    /// recency and its write freshness. Evicts the least-recently-used
    /// entry when the insert pushes the cache over capacity.
    pub fn insert(&self, key: K, value: V) {
        let seq = self.next_seq();
        {
            let mut shard = self.shards[self.shard_index(&key)].lock();
            if shard.insert(key, CacheEntry::new(value, seq)).is_none() {
                self.len.fetch_add(1, Ordering::AcqRel);
            }
        }

        while self.len.load(Ordering::Acquire) > self.max_entries {
            if !self.evict_lru() {
                break;
            }
        }
    }

    /// Returns the value for `key` if present, refreshing its access
    /// recency.
    pub fn get(&self, key: &K) -> Option<V> {
        let seq = self.next_seq();
        let mut shard = self.shards[self.shard_index(key)].lock();
        shard.get_mut(key).map(|entry| {
            entry.touch(seq);
            entry.value.clone()
        })
    }

    /// Removes the entry for `key`. No-op when absent.
    pub fn remove(&self, key: &K) -> bool {
        let mut shard = self.shards[self.shard_index(key)].lock();
        if shard.remove(key).is_some() {
            self.len.fetch_sub(1, Ordering::AcqRel);
            true
        } else {
            false
        }
    }

    /// Removes every entry whose last write is older than the staleness
    /// window. Locks one shard at a time so concurrent traffic on other
    /// shards is never blocked for longer than a single shard scan.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        for shard in &self.shards {
            let mut guard = shard.lock();
            let before = guard.len();
            guard.retain(|_, entry| !entry.is_stale(self.staleness_window, now));
            removed += before - guard.len();
        }
        if removed > 0 {
            self.len.fetch_sub(removed, Ordering::AcqRel);
            debug!("Sweep evicted {} stale cache entries", removed);
        }
        removed
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evicts the entry with the globally oldest access. Returns `false`
    /// when there was nothing to evict.
    fn evict_lru(&self) -> bool {
        let mut victim: Option<(usize, K, u64)> = None;
        for (idx, shard) in self.shards.iter().enumerate() {
            let guard = shard.lock();
            for (key, entry) in guard.iter() {
                let older = victim
                    .as_ref()
                    .map_or(true, |(_, _, seq)| entry.access_seq < *seq);
                if older {
                    victim = Some((idx, key.clone(), entry.access_seq));
                }
            }
        }

        let Some((idx, key, seq)) = victim else {
            return false;
        };

        let mut guard = self.shards[idx].lock();
        // the victim may have been touched or removed between the scan and
        // this lock; only evict if its recency is unchanged
        if guard.get(&key).is_some_and(|e| e.access_seq == seq) {
            guard.remove(&key);
            self.len.fetch_sub(1, Ordering::AcqRel);
        }
        true
    }
}

impl<K, V> Default for ResolveCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl<K, V> Sweep for ResolveCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn sweep(&self) -> usize {
        ResolveCache::sweep(self)
    }
}

impl<K, V> std::fmt::Debug for ResolveCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveCache")
            .field("len", &self.len.load(Ordering::Relaxed))
            .field("max_entries", &self.max_entries)
            .field("staleness_window", &self.staleness_window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn cache_with(max_entries: usize, staleness_ms: u64) -> ResolveCache<i64, String> {
        ResolveCache::new(&CacheConfig {
            max_entries,
            staleness_secs: 0, // overridden below
            sweep_interval_secs: 60,
            shards: 4,
        })
        .with_staleness(Duration::from_millis(staleness_ms))
    }

    impl<K, V> ResolveCache<K, V> {
        fn with_staleness(mut self, window: Duration) -> Self {
            self.staleness_window = window;
            self
        }
    }

    #[test]
    fn test_insert_and_get() {
        let cache = cache_with(10, 60_000);
        cache.insert(1, "A".to_string());
        assert_eq!(cache.get(&1), Some("A".to_string()));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_replaces_wholesale() {
        let cache = cache_with(10, 60_000);
        cache.insert(1, "A".to_string());
        cache.insert(1, "B".to_string());
        assert_eq!(cache.get(&1), Some("B".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_bound_evicts_oldest_access() {
        // the scenario from the service contract: max=2, three inserts,
        // key 1 has the oldest access and is the victim
        let cache = cache_with(2, 60_000);
        cache.insert(1, "A".to_string());
        cache.insert(2, "B".to_string());
        cache.insert(3, "C".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("B".to_string()));
        assert_eq!(cache.get(&3), Some("C".to_string()));
    }

    #[test]
    fn test_get_refreshes_recency() {
        let cache = cache_with(2, 60_000);
        cache.insert(1, "A".to_string());
        cache.insert(2, "B".to_string());

        // touching key 1 makes key 2 the LRU victim
        assert!(cache.get(&1).is_some());
        cache.insert(3, "C".to_string());

        assert_eq!(cache.get(&1), Some("A".to_string()));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some("C".to_string()));
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let cache = cache_with(5, 60_000);
        for i in 0..100 {
            cache.insert(i, format!("value-{}", i));
            assert!(cache.len() <= 5);
        }
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_remove() {
        let cache = cache_with(10, 60_000);
        cache.insert(1, "A".to_string());
        assert!(cache.remove(&1));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 0);

        // removing an absent key is a no-op
        assert!(!cache.remove(&1));
    }

    #[test]
    fn test_sweep_removes_stale_entries() {
        let cache = cache_with(10, 50);
        cache.insert(1, "A".to_string());
        std::thread::sleep(Duration::from_millis(80));
        cache.insert(2, "B".to_string());

        let removed = cache.sweep();
        assert_eq!(removed, 1);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("B".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_access_does_not_refresh_staleness() {
        // gets update recency, not freshness: a stale-but-read entry
        // still falls to the sweep
        let cache = cache_with(10, 50);
        cache.insert(1, "A".to_string());
        std::thread::sleep(Duration::from_millis(80));
        assert!(cache.get(&1).is_some());

        cache.sweep();
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn test_insert_refreshes_staleness() {
        let cache = cache_with(10, 50);
        cache.insert(1, "A".to_string());
        std::thread::sleep(Duration::from_millis(80));
        cache.insert(1, "A2".to_string());

        assert_eq!(cache.sweep(), 0);
        assert_eq!(cache.get(&1), Some("A2".to_string()));
    }

    #[test]
    fn test_sweep_empty_cache() {
        let cache = cache_with(10, 50);
        assert_eq!(cache.sweep(), 0);
    }

    #[test]
    fn test_concurrent_access_keeps_bound() {
        let cache = Arc::new(cache_with(8, 60_000));
        let mut handles = Vec::new();
        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..250i64 {
                    let key = t * 1000 + i;
                    cache.insert(key, format!("value-{}", key));
                    cache.get(&key);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 8);
    }
}
