use thiserror::Error;

/// Errors surfaced by the cache.
///
/// A missing key is never an error; lookups report absence through `Option`
/// and removals through `bool`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Failed to acquire the cache lock: {0}")]
    LockError(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;

impl<T> From<std::sync::PoisonError<T>> for CacheError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        CacheError::LockError(err.to_string())
    }
}
