// Core algorithm exports
pub mod limiter;
pub mod scoring;
pub mod tempo;

pub use limiter::{LimiterToken, RateLimiter, DEFAULT_MAX_CONCURRENT};
pub use scoring::start_score;
pub use tempo::{extract_leader, is_leader, LeaderParseError};
