use crate::models::{
    HistoricalRaceRef, HorseSearchHit, HorseSearchParams, RaceDayResults, StatRaceResult,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the statistics provider
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Statistics API client
///
/// Looks up horses by name, their result history, and race-day results.
pub struct StatsClient {
    base_url: String,
    organisation: String,
    source_of_data: String,
    client: Client,
}

impl StatsClient {
    /// Create a new statistics client
    pub fn new(
        base_url: String,
        organisation: String,
        source_of_data: String,
        timeout_secs: u64,
    ) -> Result<Self, StatsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            organisation,
            source_of_data,
            client,
        })
    }

    /// Find a horse's statistics id by name
    ///
    /// Returns `None` when the search has no hits.
    pub async fn resolve_stats_id(&self, horse_name: &str) -> Result<Option<i64>, StatsError> {
        let url = format!(
            "{}/horses/search/organisation/{}",
            self.base(),
            self.organisation
        );

        tracing::debug!("Searching horse {} at: {}", horse_name, url);

        let request = self
            .client
            .get(&url)
            .query(&HorseSearchParams::by_name(horse_name));
        let hits: Vec<HorseSearchHit> = self.fetch_json(request, &url).await?;

        Ok(hits.first().map(|hit| hit.horse_id))
    }

    /// Fetch the qualifying historical races of a horse
    pub async fn fetch_qualifying_history(
        &self,
        stats_id: i64,
    ) -> Result<Vec<HistoricalRaceRef>, StatsError> {
        let url = format!(
            "{}/horses/results/organisation/{}/sourceofdata/{}/horseid/{}",
            self.base(),
            self.organisation,
            self.source_of_data,
            stats_id
        );

        tracing::debug!("Fetching race history from: {}", url);

        let records: Vec<serde_json::Value> = self.fetch_json(self.client.get(&url), &url).await?;
        let total = records.len();

        let refs: Vec<HistoricalRaceRef> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<StatRaceResult>(record) {
                Ok(race) => race.qualifying_ref(),
                Err(e) => {
                    tracing::trace!("Skipping unreadable race of horse {}: {}", stats_id, e);
                    None
                }
            })
            .collect();

        tracing::debug!(
            "Horse {} has {} qualifying races (of {})",
            stats_id,
            refs.len(),
            total
        );

        Ok(refs)
    }

    /// Fetch every race with published results on a race day
    pub async fn fetch_race_day(&self, race_day_id: i64) -> Result<RaceDayResults, StatsError> {
        let url = format!(
            "{}/raceinfo/results/organisation/{}/sourceofdata/{}/racedayid/{}",
            self.base(),
            self.organisation,
            self.source_of_data,
            race_day_id
        );

        tracing::debug!("Fetching race day results from: {}", url);

        self.fetch_json(self.client.get(&url), &url).await
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, StatsError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(StatsError::ApiError(format!(
                "Failed to fetch {}: {}",
                url,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StatsError::InvalidResponse(format!("{}: {}", url, e)))
    }
}
