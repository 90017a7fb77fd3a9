//! Wire shapes of the two upstream providers.
//!
//! Only the fields the pipeline reads are modelled; everything else is ignored.

use super::domain::HistoricalRaceRef;
use serde::{Deserialize, Serialize};

/// Start-list responses wrap their payload in a `collection` field
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    pub collection: Option<Vec<T>>,
}

/// One race-day card at a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardInfo {
    #[serde(rename = "trackName")]
    pub track_name: String,
    #[serde(rename = "cardId")]
    pub card_id: i64,
}

/// One start within a card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceInfo {
    pub number: u32,
    #[serde(rename = "raceId")]
    pub race_id: i64,
}

/// A runner as listed by the start-list provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerInfo {
    #[serde(rename = "startNumber")]
    pub start_number: u32,
    #[serde(rename = "horseName")]
    pub horse_name: String,
}

/// Query parameters for the statistics horse search
#[derive(Debug, Clone, Serialize)]
pub struct HorseSearchParams<'a> {
    pub age: u32,
    pub gender: &'a str,
    #[serde(rename = "horseName")]
    pub horse_name: &'a str,
    #[serde(rename = "trotBreed")]
    pub trot_breed: &'a str,
    #[serde(rename = "autoSuffixWildcard")]
    pub auto_suffix_wildcard: bool,
}

impl<'a> HorseSearchParams<'a> {
    pub fn by_name(horse_name: &'a str) -> Self {
        Self {
            age: 0,
            gender: "BOTH",
            horse_name,
            trot_breed: "ALL",
            auto_suffix_wildcard: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HorseSearchHit {
    #[serde(rename = "horseId")]
    pub horse_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceInformation {
    #[serde(rename = "raceId")]
    pub race_id: i64,
    #[serde(rename = "raceDayId")]
    pub race_day_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartPosition {
    #[serde(rename = "sortValue", default)]
    pub sort_value: Option<u32>,
}

/// One entry of a horse's result history
///
/// Withdrawn races often come without a start position, so every field the
/// filter reads is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct StatRaceResult {
    #[serde(rename = "raceInformation", default)]
    pub race_information: Option<RaceInformation>,
    #[serde(rename = "startPosition", default)]
    pub start_position: Option<StartPosition>,
    #[serde(rename = "startMethod", default)]
    pub start_method: Option<String>,
    #[serde(default)]
    pub withdrawn: Option<bool>,
}

/// Gate start marker used by the statistics provider
pub const GATE_START: &str = "A";

/// Races started from a sort position at or above this are not comparable
pub const MAX_SORT_POSITION: u32 = 9;

impl StatRaceResult {
    /// Not withdrawn, gate start, and a favourable sort position
    #[inline]
    pub fn qualifies(&self) -> bool {
        self.qualifying_ref().is_some()
    }

    /// The race reference, when the race qualifies
    ///
    /// A record missing its race information or sort position never qualifies.
    pub fn qualifying_ref(&self) -> Option<HistoricalRaceRef> {
        if self.withdrawn != Some(false) || self.start_method.as_deref() != Some(GATE_START) {
            return None;
        }

        let sort_value = self.start_position.as_ref()?.sort_value?;
        if sort_value >= MAX_SORT_POSITION {
            return None;
        }

        let info = self.race_information.as_ref()?;
        Some(HistoricalRaceRef {
            race_id: info.race_id,
            race_day_id: info.race_day_id,
            horse_start_number: sort_value,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralInfo {
    #[serde(rename = "tempoText", default)]
    pub tempo_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadyRace {
    #[serde(rename = "raceId")]
    pub race_id: i64,
    #[serde(rename = "generalInfo", default)]
    pub general_info: GeneralInfo,
}

/// All races of one race day that have published results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceDayResults {
    #[serde(rename = "racesWithReadyResult", default)]
    pub races_with_ready_result: Option<Vec<ReadyRace>>,
}

impl RaceDayResults {
    /// Tempo text of a race, or empty when the day has no usable entry for it
    pub fn tempo_text_for(&self, race_id: i64) -> String {
        self.races_with_ready_result
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|race| race.race_id == race_id)
            .last()
            .and_then(|race| race.general_info.tempo_text.clone())
            .unwrap_or_default()
    }
}
