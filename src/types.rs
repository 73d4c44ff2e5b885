use std::time::Instant;

/// A stored value together with its bookkeeping.
///
/// The access counter lives beside the value so both are created and
/// dropped together.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub value: String,
    pub expiration: Option<Instant>,
    /// Logical clock value of the last `set` or successful `get`.
    pub last_accessed: u64,
    pub access_count: u64,
}

impl CacheEntry {
    pub fn new(value: String, expiration: Option<Instant>, tick: u64) -> Self {
        Self {
            value,
            expiration,
            last_accessed: tick,
            access_count: 0,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expiration.is_some_and(|exp| now >= exp)
    }
}
