//! Insertion-order bounded cache for loaded images.
//!
//! Entries are kept in a `HashMap` for lookup plus a `VecDeque` recording
//! insertion order. Both live behind one `parking_lot::Mutex`; every
//! operation is short and synchronous, so the lock is never held across an
//! await point.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use super::CacheStats;
use crate::loader::ImageHandle;

/// Default number of images kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

struct Entries<H> {
    map: HashMap<String, H>,
    order: VecDeque<String>,
}

/// Bounded key → handle store with oldest-first eviction.
///
/// Generic over the handle type so the eviction policy can be tested
/// without decoding images; the loader uses [`ImageHandle`].
pub struct ImageCache<H = ImageHandle> {
    entries: Mutex<Entries<H>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<H: Clone> ImageCache<H> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(Entries {
                map: HashMap::with_capacity(capacity + 1),
                order: VecDeque::with_capacity(capacity + 1),
            }),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up a handle. Does not affect eviction order.
    pub fn get(&self, key: &str) -> Option<H> {
        let found = self.entries.lock().map.get(key).cloned();
        match found {
            Some(handle) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(handle)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Check whether a key is cached.
    pub fn has(&self, key: &str) -> bool {
        self.entries.lock().map.contains_key(key)
    }

    /// Insert a handle at the newest position.
    ///
    /// Re-inserting an existing key replaces its handle in place without
    /// moving it. If the insert pushes the cache over capacity, the single
    /// oldest entry is evicted and its key returned.
    pub fn put(&self, key: impl Into<String>, handle: H) -> Option<String> {
        let key = key.into();
        let mut entries = self.entries.lock();

        if let Some(existing) = entries.map.get_mut(&key) {
            *existing = handle;
            return None;
        }

        entries.order.push_back(key.clone());
        entries.map.insert(key, handle);

        if entries.map.len() <= self.capacity {
            return None;
        }

        let oldest = entries.order.pop_front()?;
        entries.map.remove(&oldest);
        drop(entries);

        self.evictions.fetch_add(1, Ordering::Relaxed);
        debug!(
            evicted = %oldest,
            capacity = self.capacity,
            "Image cache full, evicted oldest entry"
        );
        Some(oldest)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().order.iter().cloned().collect()
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.map.clear();
        entries.order.clear();
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entry_count: self.len(),
            capacity: self.capacity,
        }
    }
}

impl<H: Clone> Default for ImageCache<H> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cache_is_empty() {
        let cache: ImageCache<u32> = ImageCache::new(10);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 10);
    }

    #[test]
    fn test_default_capacity() {
        let cache: ImageCache<u32> = ImageCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let cache: ImageCache<u32> = ImageCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.put("a", 1);
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn test_put_and_get() {
        let cache = ImageCache::new(4);
        cache.put("a", 1);

        assert!(cache.has("a"));
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_oldest_evicted_when_over_capacity() {
        let cache = ImageCache::new(2);
        assert_eq!(cache.put("a", 'a'), None);
        assert_eq!(cache.put("b", 'b'), None);
        assert_eq!(cache.put("c", 'c'), Some("a".to_string()));

        assert!(!cache.has("a"));
        assert!(cache.has("b"));
        assert!(cache.has("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_hit_does_not_refresh_recency() {
        let cache = ImageCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);

        // A true LRU would now evict "b"
        assert_eq!(cache.get("a"), Some(1));
        cache.put("c", 3);

        assert!(!cache.has("a"));
        assert!(cache.has("b"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let cache = ImageCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.put("a", 10), None);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.len(), 2);

        cache.put("c", 3);
        assert!(!cache.has("a"));
        assert_eq!(cache.keys(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_clear() {
        let cache = ImageCache::new(4);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.clear();

        assert!(cache.is_empty());
        assert!(!cache.has("a"));
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn test_statistics() {
        let cache = ImageCache::new(1);
        cache.put("a", 1);
        cache.get("a");
        cache.get("a");
        cache.get("b");
        cache.put("b", 2);

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.capacity, 1);
    }

    #[test]
    fn test_has_does_not_count_lookups() {
        let cache: ImageCache<u32> = ImageCache::new(2);
        cache.has("a");
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_concurrent_puts_respect_capacity() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(ImageCache::new(16));
        let mut handles = Vec::new();

        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    cache.put(format!("{}-{}", t, i), i);
                    assert!(cache.len() <= 16);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 16);
        assert_eq!(cache.stats().evictions, 800 - 16);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_size_bounded_and_evicts_oldest_inserted(
                capacity in 1usize..8,
                ops in proptest::collection::vec((0u8..12, any::<bool>()), 0..64)
            ) {
                let cache = ImageCache::new(capacity);
                let mut model: VecDeque<String> = VecDeque::new();

                for (id, read_first) in ops {
                    let key = format!("k{}", id);
                    if read_first {
                        // Reads must never influence eviction
                        cache.get(&key);
                    }

                    let evicted = cache.put(key.clone(), id);
                    let expected = if model.contains(&key) {
                        None
                    } else {
                        model.push_back(key);
                        if model.len() > capacity { model.pop_front() } else { None }
                    };

                    prop_assert_eq!(evicted, expected);
                    prop_assert!(cache.len() <= capacity);
                    prop_assert_eq!(cache.keys(), model.iter().cloned().collect::<Vec<_>>());
                }
            }
        }
    }
}
