mod cache;
mod config;
mod error;
mod ranking;
mod shared;
mod stats;
mod types;

pub use cache::AccessCache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use ranking::Direction;
pub use shared::SharedCache;
pub use stats::CacheStats;
