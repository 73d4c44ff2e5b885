use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::cache::AccessCache;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::stats::CacheStats;

/// Cloneable handle to an [`AccessCache`] shared between threads.
///
/// `get` mutates counters, so it takes the write lock along with every other
/// mutating call. Pure reads share the read lock. No lock is held between
/// calls, and a poisoned lock is reported as [`CacheError::LockError`].
///
/// [`CacheError::LockError`]: crate::CacheError::LockError
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    inner: Arc<RwLock<AccessCache>>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AccessCache::with_config(config))),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.inner.write()?.set(key, value);
        Ok(())
    }

    pub fn set_with_ttl(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Result<()> {
        self.inner.write()?.set_with_ttl(key, value, ttl);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.write()?.get(key).map(str::to_owned))
    }

    pub fn get_or_set(&self, key: impl Into<String>, default: impl Into<String>) -> Result<String> {
        Ok(self.inner.write()?.get_or_set(key, default))
    }

    pub fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.inner.write()?.delete(key))
    }

    pub fn update_ttl(&self, key: &str, ttl: Duration) -> Result<bool> {
        Ok(self.inner.write()?.update_ttl(key, ttl))
    }

    pub fn purge_expired(&self) -> Result<usize> {
        Ok(self.inner.write()?.purge_expired())
    }

    pub fn clear(&self) -> Result<()> {
        self.inner.write()?.clear();
        Ok(())
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.inner.read()?.contains(key))
    }

    pub fn access_count(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.inner.read()?.access_count(key))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.inner.read()?.is_empty())
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.inner.read()?.keys())
    }

    pub fn stats(&self) -> Result<CacheStats> {
        Ok(self.inner.read()?.stats())
    }

    pub fn most_accessed(&self, n: usize) -> Result<Vec<String>> {
        Ok(self.inner.read()?.most_accessed(n))
    }

    pub fn least_accessed(&self, n: usize) -> Result<Vec<String>> {
        Ok(self.inner.read()?.least_accessed(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheError;
    use std::panic::{self, AssertUnwindSafe};
    use std::thread;

    #[test]
    fn test_concurrent_gets_are_all_counted() {
        let cache = SharedCache::new();
        cache.set("hot", "value").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        cache.get("hot").unwrap();
                        cache.get(&format!("missing:{i}")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats().unwrap();
        assert_eq!(stats.hits(), 800);
        assert_eq!(stats.misses(), 800);
        assert_eq!(cache.access_count("hot").unwrap(), Some(800));
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let cache = SharedCache::new();
        let inner = Arc::clone(&cache.inner);
        let _ = panic::catch_unwind(AssertUnwindSafe(move || {
            let _guard = inner.write().unwrap();
            panic!("poison the lock");
        }));

        assert!(matches!(cache.get("k"), Err(CacheError::LockError(_))));
        assert!(matches!(cache.len(), Err(CacheError::LockError(_))));
    }
}
