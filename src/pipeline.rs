use crate::core::{start_score, RateLimiter};
use crate::models::{
    HistoricalRaceRef, HorseEntry, HorseStartSpeedInfo, LeaderSample, ReportSource,
    StartSpeedReport, TrackQuery,
};
use crate::services::{
    CacheError, CacheKey, CacheManager, StartListClient, StartListError, StatsClient, StatsError,
};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

/// Run-level failures; everything after the start list is resolved is absorbed
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] validator::ValidationErrors),

    #[error(transparent)]
    StartList(#[from] StartListError),
}

impl PipelineError {
    /// Whether the track, start, or runner list could not be found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PipelineError::StartList(StartListError::NotFound(_)))
    }
}

/// Start speed orchestrator
///
/// # Pipeline Stages
/// 1. Cache check by `<track>-<start>`
/// 2. Start list resolution (track -> card -> race -> horses)
/// 3. Rate-limited fan-out per horse: stats id, qualifying history, race days
/// 4. Scoring, sort by start number, cache write
#[derive(Clone)]
pub struct StartSpeedPipeline {
    start_list: Arc<StartListClient>,
    stats: Arc<StatsClient>,
    cache: Arc<CacheManager>,
    limiter: RateLimiter,
}

impl StartSpeedPipeline {
    pub fn new(
        start_list: Arc<StartListClient>,
        stats: Arc<StatsClient>,
        cache: Arc<CacheManager>,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            start_list,
            stats,
            cache,
            limiter,
        }
    }

    /// Produce the ranked start speed list for a start, using the cache when possible
    pub async fn run(&self, query: &TrackQuery) -> Result<StartSpeedReport, PipelineError> {
        self.run_with(query, false).await
    }

    /// Like [`run`](Self::run), but `refresh` skips the cache read
    pub async fn run_with(
        &self,
        query: &TrackQuery,
        refresh: bool,
    ) -> Result<StartSpeedReport, PipelineError> {
        query.validate()?;

        let cache_key = CacheKey::start(&query.track_name, query.start_number);

        if !refresh {
            match self.cache.get::<Vec<HorseStartSpeedInfo>>(&cache_key).await {
                Ok(horses) => {
                    tracing::info!("Found {} horses in cache for {}", horses.len(), cache_key);
                    return Ok(StartSpeedReport {
                        source: ReportSource::Cached,
                        horses,
                    });
                }
                Err(CacheError::CacheMiss(_)) => {
                    tracing::info!("Cache miss for {}, retrieving data", cache_key);
                }
                Err(e) => {
                    tracing::warn!("Cache read failed for {}, recomputing: {}", cache_key, e);
                }
            }
        }

        let horses = self.start_list.resolve(query).await?;

        let mut results: Vec<HorseStartSpeedInfo> =
            join_all(horses.into_iter().map(|horse| self.score_horse(horse))).await;

        results.sort_by_key(|info| info.start_number);

        if let Err(e) = self.cache.set(&cache_key, &results).await {
            tracing::warn!("Failed to cache result for {}: {}", cache_key, e);
        }

        tracing::info!("Scored {} horses for {}", results.len(), cache_key);

        Ok(StartSpeedReport {
            source: ReportSource::Computed,
            horses: results,
        })
    }

    /// One horse's sub-pipeline, gated by the rate limiter
    ///
    /// Never fails: any upstream error leaves the horse with a score of 0.
    async fn score_horse(&self, horse: HorseEntry) -> HorseStartSpeedInfo {
        let token = self.limiter.acquire().await;

        let refs = match self.qualifying_history(&horse.horse_name).await {
            Ok(refs) => refs,
            Err(e) => {
                tracing::warn!("History lookup failed for {}: {}", horse.horse_name, e);
                Vec::new()
            }
        };

        let samples = self.leader_samples(&refs).await;
        let score = start_score(&horse.horse_name, &samples, refs.len());

        self.limiter.release(token);

        tracing::debug!(
            "Horse {} {} scored {:.2} over {} races",
            horse.start_number,
            horse.horse_name,
            score,
            refs.len()
        );

        HorseStartSpeedInfo {
            start_number: horse.start_number,
            name: horse.horse_name,
            start_score: score,
        }
    }

    async fn qualifying_history(
        &self,
        horse_name: &str,
    ) -> Result<Vec<HistoricalRaceRef>, StatsError> {
        match self.stats.resolve_stats_id(horse_name).await? {
            Some(stats_id) => self.stats.fetch_qualifying_history(stats_id).await,
            None => {
                tracing::debug!("No statistics entry for {}", horse_name);
                Ok(Vec::new())
            }
        }
    }

    /// Fetch the tempo text of every referenced race, concurrently
    async fn leader_samples(&self, refs: &[HistoricalRaceRef]) -> Vec<LeaderSample> {
        join_all(refs.iter().map(|race| async move {
            let tempo_text = match self.stats.fetch_race_day(race.race_day_id).await {
                Ok(day) => day.tempo_text_for(race.race_id),
                Err(e) => {
                    tracing::warn!("Race day {} unavailable: {}", race.race_day_id, e);
                    String::new()
                }
            };

            LeaderSample {
                horse_start_number: race.horse_start_number,
                tempo_text,
            }
        }))
        .await
    }
}
