// Model exports
pub mod domain;
pub mod upstream;

pub use domain::{
    normalize_horse_name, HistoricalRaceRef, HorseEntry, HorseStartSpeedInfo, LeaderSample,
    ReportSource, StartSpeedReport, TrackQuery,
};
pub use upstream::{
    CardInfo, Collection, HorseSearchHit, HorseSearchParams, RaceDayResults, RaceInfo, RunnerInfo,
    StatRaceResult,
};
