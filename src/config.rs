use std::num::NonZeroUsize;
use std::time::Duration;

/// Construction options for an [`AccessCache`](crate::AccessCache).
///
/// The default is unbounded with no expiry.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    pub(crate) max_size: Option<NonZeroUsize>,
    pub(crate) default_ttl: Option<Duration>,
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of live entries; inserting a new key past the cap
    /// evicts the least recently used entry.
    pub fn with_max_size(mut self, size: NonZeroUsize) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Expiry applied by `set` when no explicit TTL is given.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    pub fn max_size(&self) -> Option<NonZeroUsize> {
        self.max_size
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }
}
