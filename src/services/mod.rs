// Service exports
pub mod cache;
pub mod start_list;
pub mod stats;

pub use cache::{CacheError, CacheKey, CacheManager, DEFAULT_TTL_SECS};
pub use start_list::{StartListClient, StartListError};
pub use stats::{StatsClient, StatsError};
