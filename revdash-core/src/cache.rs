//! Keyed time-expiring response cache.
//!
//! An explicit cache object owned by the fetching layer: created once at
//! startup, injected into the fetch worker, and never torn down during the
//! process lifetime. Entries pass through two windows — after the staleness
//! window a hit is reported as [`Lookup::Stale`] (the caller refetches), and
//! after the longer eviction window [`sweep`](ResponseCache::sweep) removes
//! the entry entirely.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Outcome of a cache lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a, V> {
    /// Entry present and inside the staleness window; serve it directly.
    Fresh(&'a V),
    /// Entry present but past the staleness window; refetch and replace.
    Stale(&'a V),
    /// No entry for this key.
    Miss,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// In-memory response cache keyed by fetch key.
pub struct ResponseCache<K, V> {
    stale_after: Duration,
    evict_after: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash, V> ResponseCache<K, V> {
    /// Creates a cache with the given staleness and eviction windows.
    ///
    /// `stale_after` must not exceed `evict_after`; a stale-but-resident
    /// entry is what allows the UI to keep showing the previous payload
    /// while its replacement is in flight.
    pub fn new(stale_after: Duration, evict_after: Duration) -> Self {
        debug_assert!(stale_after <= evict_after);
        Self {
            stale_after,
            evict_after,
            entries: HashMap::new(),
        }
    }

    /// Inserts or replaces the entry for `key`, resetting its age.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Looks up `key`, classifying the result by entry age.
    pub fn get(&self, key: &K) -> Lookup<'_, V> {
        match self.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.stale_after => {
                Lookup::Fresh(&entry.value)
            }
            Some(entry) => Lookup::Stale(&entry.value),
            None => Lookup::Miss,
        }
    }

    /// Evicts every entry older than the eviction window.
    ///
    /// Called by the fetch worker before each request; there is no background
    /// timer, so an idle cache simply holds its entries until the next sweep.
    pub fn sweep(&mut self) {
        let evict_after = self.evict_after;
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < evict_after);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entries_are_served() {
        let mut cache = ResponseCache::new(Duration::from_secs(30), Duration::from_secs(300));
        cache.insert("metrics", 1u32);
        assert_eq!(cache.get(&"metrics"), Lookup::Fresh(&1));
        assert_eq!(cache.get(&"reviews"), Lookup::Miss);
    }

    #[test]
    fn entries_turn_stale_after_the_staleness_window() {
        let mut cache = ResponseCache::new(Duration::from_millis(10), Duration::from_secs(300));
        cache.insert("metrics", 1u32);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&"metrics"), Lookup::Stale(&1));
    }

    #[test]
    fn sweep_evicts_only_past_the_eviction_window() {
        let mut cache = ResponseCache::new(Duration::from_millis(5), Duration::from_millis(25));
        cache.insert("old", 1u32);
        std::thread::sleep(Duration::from_millis(10));
        cache.insert("young", 2u32);
        cache.sweep();
        assert_eq!(cache.len(), 2, "stale but unexpired entries survive the sweep");

        std::thread::sleep(Duration::from_millis(20));
        cache.sweep();
        assert_eq!(cache.get(&"old"), Lookup::Miss);
        assert_eq!(cache.get(&"young"), Lookup::Stale(&2));
    }

    #[test]
    fn reinsert_resets_entry_age() {
        let mut cache = ResponseCache::new(Duration::from_millis(15), Duration::from_secs(300));
        cache.insert("metrics", 1u32);
        std::thread::sleep(Duration::from_millis(20));
        cache.insert("metrics", 2u32);
        assert_eq!(cache.get(&"metrics"), Lookup::Fresh(&2));
    }
}
