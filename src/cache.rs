use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::config::CacheConfig;
use crate::ranking::{self, Direction};
use crate::stats::CacheStats;
use crate::types::CacheEntry;

/// In-memory string cache that counts how often each key is read.
///
/// Every `get` is recorded as a hit or a miss, and every hit bumps the
/// key's access count. Overwriting a key with `set` keeps its count;
/// deleting it discards the count.
///
/// Expired entries are dropped lazily: they are invisible to every read
/// and removed the next time a mutating call touches them or
/// [`purge_expired`](Self::purge_expired) runs.
#[derive(Debug, Default)]
pub struct AccessCache {
    data: HashMap<String, CacheEntry>,
    config: CacheConfig,
    stats: CacheStats,
    tick: u64,
}

impl AccessCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            data: HashMap::new(),
            config,
            stats: CacheStats::default(),
            tick: 0,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Insert or overwrite `key`. A new key starts with an access count of 0.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key.into(), value.into(), None);
    }

    /// Like [`set`](Self::set), expiring the entry after `ttl`.
    pub fn set_with_ttl(&mut self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        self.insert(key.into(), value.into(), Some(ttl));
    }

    fn insert(&mut self, key: String, value: String, ttl: Option<Duration>) {
        let now = Instant::now();
        self.drop_if_expired(&key, now);

        let expiration = ttl.or(self.config.default_ttl).map(|duration| now + duration);
        let tick = self.next_tick();

        if let Some(entry) = self.data.get_mut(&key) {
            entry.value = value;
            entry.expiration = expiration;
            entry.last_accessed = tick;
            return;
        }

        self.make_room(now);
        self.data.insert(key, CacheEntry::new(value, expiration, tick));
    }

    /// Look up `key`, recording a hit (and bumping its access count) or a miss.
    pub fn get(&mut self, key: &str) -> Option<&str> {
        let now = Instant::now();
        if self.drop_if_expired(key, now) {
            self.stats.record_miss();
            trace!("miss on expired key {key}");
            return None;
        }

        let tick = self.next_tick();
        match self.data.get_mut(key) {
            Some(entry) => {
                entry.access_count += 1;
                entry.last_accessed = tick;
                self.stats.record_hit();
                trace!("hit on {key} (count {})", entry.access_count);
                Some(entry.value.as_str())
            }
            None => {
                self.stats.record_miss();
                trace!("miss on {key}");
                None
            }
        }
    }

    /// Return the stored value, or store `default` and return it.
    ///
    /// The lookup is counted exactly like [`get`](Self::get).
    pub fn get_or_set(&mut self, key: impl Into<String>, default: impl Into<String>) -> String {
        let key = key.into();
        if let Some(value) = self.get(&key) {
            return value.to_string();
        }
        let default = default.into();
        self.insert(key, default.clone(), None);
        default
    }

    /// Presence check that leaves every counter untouched.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.data.get(key).is_some_and(|entry| !entry.is_expired(now))
    }

    pub fn access_count(&self, key: &str) -> Option<u64> {
        let now = Instant::now();
        self.data
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.access_count)
    }

    /// Re-arm the expiry of a live key. Returns false if the key is absent.
    pub fn update_ttl(&mut self, key: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        if self.drop_if_expired(key, now) {
            return false;
        }
        match self.data.get_mut(key) {
            Some(entry) => {
                entry.expiration = Some(now + ttl);
                true
            }
            None => false,
        }
    }

    /// Remove `key` and its access count. Hit/miss counters are unaffected.
    pub fn delete(&mut self, key: &str) -> bool {
        let now = Instant::now();
        if self.drop_if_expired(key, now) {
            return false;
        }
        self.data.remove(key).is_some()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.live_entries(Instant::now()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All live keys in lexicographic order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .live_entries(Instant::now())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Up to `n` keys with the highest access counts, highest first.
    pub fn most_accessed(&self, n: usize) -> Vec<String> {
        self.ranked(n, Direction::Most)
    }

    /// Up to `n` keys with the lowest access counts, lowest first.
    pub fn least_accessed(&self, n: usize) -> Vec<String> {
        self.ranked(n, Direction::Least)
    }

    fn ranked(&self, n: usize, direction: Direction) -> Vec<String> {
        let counts = self
            .live_entries(Instant::now())
            .map(|(key, entry)| (key.as_str(), entry.access_count));
        ranking::rank(counts, n, direction)
    }

    /// Drop every entry and reset all counters.
    pub fn clear(&mut self) {
        debug!("clearing {} entries", self.data.len());
        self.data.clear();
        self.stats = CacheStats::default();
        self.tick = 0;
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.data.len();
        self.data.retain(|_, entry| !entry.is_expired(now));
        let purged = before - self.data.len();
        self.stats.evictions += purged as u64;
        if purged > 0 {
            debug!("purged {purged} expired entries");
        }
        purged
    }

    fn live_entries(&self, now: Instant) -> impl Iterator<Item = (&String, &CacheEntry)> + '_ {
        self.data.iter().filter(move |(_, entry)| !entry.is_expired(now))
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Remove `key` if it has expired. Returns whether it was removed.
    fn drop_if_expired(&mut self, key: &str, now: Instant) -> bool {
        let expired = self.data.get(key).is_some_and(|entry| entry.is_expired(now));
        if expired {
            self.data.remove(key);
            self.stats.record_eviction();
            debug!("expired {key}");
        }
        expired
    }

    /// Evict until a new key fits under `max_size`.
    fn make_room(&mut self, now: Instant) {
        let Some(max_size) = self.config.max_size else {
            return;
        };
        if self.data.len() < max_size.get() {
            return;
        }

        let before = self.data.len();
        self.data.retain(|_, entry| !entry.is_expired(now));
        self.stats.evictions += (before - self.data.len()) as u64;

        while self.data.len() >= max_size.get() {
            let Some(victim) = self
                .data
                .iter()
                .min_by_key(|(_, entry)| (entry.last_accessed, entry.access_count))
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            self.data.remove(&victim);
            self.stats.record_eviction();
            debug!("evicted least recently used key {victim}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use std::thread;

    #[test]
    fn test_set_and_get() {
        let mut cache = AccessCache::new();
        cache.set("user:1", "Alice");
        assert_eq!(cache.get("user:1"), Some("Alice"));
        assert_eq!(cache.get("user:2"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_keeps_access_count() {
        let mut cache = AccessCache::new();
        cache.set("k", "v1");
        cache.get("k");
        cache.get("k");
        cache.set("k", "v2");
        assert_eq!(cache.access_count("k"), Some(2));
        assert_eq!(cache.get("k"), Some("v2"));
        assert_eq!(cache.access_count("k"), Some(3));
    }

    #[test]
    fn test_delete_discards_count() {
        let mut cache = AccessCache::new();
        cache.set("k", "v");
        cache.get("k");
        assert!(cache.delete("k"));
        assert_eq!(cache.access_count("k"), None);
        cache.set("k", "v");
        assert_eq!(cache.access_count("k"), Some(0));
    }

    #[test]
    fn test_contains_has_no_side_effects() {
        let mut cache = AccessCache::new();
        cache.set("k", "v");
        assert!(cache.contains("k"));
        assert!(!cache.contains("missing"));
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(cache.access_count("k"), Some(0));
    }

    #[test]
    fn test_get_or_set() {
        let mut cache = AccessCache::new();
        assert_eq!(cache.get_or_set("theme", "dark"), "dark");
        assert_eq!(cache.get_or_set("theme", "light"), "dark");

        let stats = cache.stats();
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert_eq!(cache.access_count("theme"), Some(1));
    }

    #[test]
    fn test_max_size_evicts_least_recently_used() {
        let config = CacheConfig::new().with_max_size(NonZeroUsize::new(2).unwrap());
        let mut cache = AccessCache::with_config(config);
        cache.set("a", "1");
        cache.set("b", "2");
        cache.get("a");
        cache.set("c", "3");

        assert_eq!(cache.keys(), vec!["a", "c"]);
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let config = CacheConfig::new().with_max_size(NonZeroUsize::new(2).unwrap());
        let mut cache = AccessCache::with_config(config);
        cache.set("a", "1");
        cache.set("b", "2");
        cache.set("a", "3");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions(), 0);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let mut cache = AccessCache::new();
        cache.set_with_ttl("session", "abc", Duration::from_millis(20));
        assert_eq!(cache.get("session"), Some("abc"));

        thread::sleep(Duration::from_millis(40));

        assert!(!cache.contains("session"));
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get("session"), None);

        let stats = cache.stats();
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.evictions(), 1);
    }

    #[test]
    fn test_set_over_expired_entry_resets_count() {
        let mut cache = AccessCache::new();
        cache.set_with_ttl("k", "old", Duration::from_millis(20));
        cache.get("k");
        thread::sleep(Duration::from_millis(40));

        cache.set("k", "new");
        assert_eq!(cache.access_count("k"), Some(0));
        assert_eq!(cache.get("k"), Some("new"));
    }

    #[test]
    fn test_default_ttl_and_purge() {
        let config = CacheConfig::new().with_default_ttl(Duration::from_millis(20));
        let mut cache = AccessCache::with_config(config);
        cache.set("a", "1");
        cache.set("b", "2");
        cache.set_with_ttl("c", "3", Duration::from_secs(60));

        thread::sleep(Duration::from_millis(40));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.keys(), vec!["c"]);
        assert_eq!(cache.stats().evictions(), 2);
    }

    #[test]
    fn test_update_ttl() {
        let mut cache = AccessCache::new();
        cache.set("k", "v");
        assert!(cache.update_ttl("k", Duration::from_millis(20)));
        assert!(!cache.update_ttl("missing", Duration::from_secs(1)));

        thread::sleep(Duration::from_millis(40));
        assert!(!cache.update_ttl("k", Duration::from_secs(1)));
        assert!(!cache.delete("k"));
    }

    #[test]
    fn test_clear_resets_evictions() {
        let config = CacheConfig::new().with_max_size(NonZeroUsize::new(1).unwrap());
        let mut cache = AccessCache::with_config(config);
        cache.set("a", "1");
        cache.set("b", "2");
        assert_eq!(cache.stats().evictions(), 1);

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
        assert!(cache.is_empty());
    }
}
