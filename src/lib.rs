//! Startspeed - start speed scoring for trotting races
//!
//! This library ranks the horses of one start by how often they led the
//! early pace in comparable historical races. It cross-references a
//! start-list provider with a statistics provider and caches the ranking.

pub mod config;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod services;

// Re-export commonly used types
pub use crate::core::{extract_leader, start_score, LeaderParseError, RateLimiter};
pub use crate::models::{HorseStartSpeedInfo, ReportSource, StartSpeedReport, TrackQuery};
pub use crate::pipeline::{PipelineError, StartSpeedPipeline};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(extract_leader("1.14 (3 Exported)"), Ok("Exported"));
        assert_eq!(RateLimiter::default().capacity(), 15);
    }
}
