//! Bounded memoization cache
//!
//! Entries are evicted oldest-inserted first once the cache is over
//! capacity. Reads never change eviction order. Re-inserting an existing
//! key counts as a fresh insertion.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::hash::Hash;

/// Thread-safe bounded cache with insertion-order eviction
pub struct Cache<K, V> {
    entries: RwLock<IndexMap<K, V>>,
    capacity: usize,
}

impl<K: Eq + Hash, V: Clone> Cache<K, V> {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Cache {
            entries: RwLock::new(IndexMap::with_capacity(capacity.min(4096))),
            capacity: capacity.max(1),
        }
    }

    /// Look up a cached value
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    /// Insert a value, evicting the oldest entries beyond capacity
    pub fn put(&self, key: K, value: V) {
        let mut entries = self.entries.write();
        entries.shift_remove(&key);
        entries.insert(key, value);
        while entries.len() > self.capacity {
            entries.shift_remove_index(0);
        }
    }

    /// Remove an entry, returning its value
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().shift_remove(key)
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached entries
    pub fn size(&self) -> usize {
        self.entries.read().len()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
