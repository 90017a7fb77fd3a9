use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input identity for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct TrackQuery {
    #[validate(length(min = 1))]
    pub track_name: String,
    #[validate(range(min = 1))]
    pub start_number: u32,
}

impl TrackQuery {
    pub fn new(track_name: impl Into<String>, start_number: u32) -> Self {
        Self {
            track_name: track_name.into(),
            start_number,
        }
    }
}

/// A horse entered in a start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorseEntry {
    pub start_number: u32,
    pub horse_name: String,
}

impl HorseEntry {
    /// Build an entry, stripping breeding annotations after the first `*`
    pub fn new(start_number: u32, raw_name: &str) -> Self {
        Self {
            start_number,
            horse_name: normalize_horse_name(raw_name).to_string(),
        }
    }
}

/// Truncate a start-list horse name at the first `*`
#[inline]
pub fn normalize_horse_name(raw: &str) -> &str {
    raw.split('*').next().unwrap_or(raw)
}

/// One qualifying past race for a horse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalRaceRef {
    pub race_id: i64,
    pub race_day_id: i64,
    /// Starting position the horse had in that race
    pub horse_start_number: u32,
}

/// Raw per-race signal before leader extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderSample {
    pub horse_start_number: u32,
    /// Empty when the race day had no usable result for the race
    pub tempo_text: String,
}

/// Final output unit, also the cached payload element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorseStartSpeedInfo {
    #[serde(rename = "startNumber")]
    pub start_number: u32,
    pub name: String,
    #[serde(rename = "startScore")]
    pub start_score: f64,
}

/// Where a run's ranked list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    Cached,
    Computed,
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct StartSpeedReport {
    pub source: ReportSource,
    pub horses: Vec<HorseStartSpeedInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_horse_name() {
        assert_eq!(normalize_horse_name("Readly Express*"), "Readly Express");
        assert_eq!(normalize_horse_name("Propulsion* (SE)"), "Propulsion");
        assert_eq!(normalize_horse_name("Plain Name"), "Plain Name");
        assert_eq!(normalize_horse_name("*"), "");
    }

    #[test]
    fn test_track_query_validation() {
        assert!(TrackQuery::new("Solvalla", 5).validate().is_ok());
        assert!(TrackQuery::new("", 5).validate().is_err());
        assert!(TrackQuery::new("Solvalla", 0).validate().is_err());
    }

    #[test]
    fn test_speed_info_wire_format() {
        let info = HorseStartSpeedInfo {
            start_number: 3,
            name: "Horse".to_string(),
            start_score: 0.5,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["startNumber"], 3);
        assert_eq!(json["name"], "Horse");
        assert_eq!(json["startScore"], 0.5);
    }
}
