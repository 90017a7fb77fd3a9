use crate::models::{CardInfo, Collection, HorseEntry, RaceInfo, RunnerInfo, TrackQuery};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the start-list provider
#[derive(Debug, Error)]
pub enum StartListError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Start-list API client
///
/// Resolves a track name and start number down to the horses entered:
/// - today's cards -> card id for the track
/// - races on the card -> race id for the start
/// - runners in the race -> horse entries
pub struct StartListClient {
    base_url: String,
    client: Client,
}

impl StartListClient {
    /// Create a new start-list client
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, StartListError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Run all three lookups for a query
    pub async fn resolve(&self, query: &TrackQuery) -> Result<Vec<HorseEntry>, StartListError> {
        let card_id = self.resolve_track_id(&query.track_name).await?;
        let race_id = self.resolve_start_id(card_id, query.start_number).await?;
        self.resolve_horses(race_id).await
    }

    /// Find today's card id for a track
    ///
    /// Track names are compared case-insensitively. When several cards match,
    /// the last one listed wins.
    pub async fn resolve_track_id(&self, track_name: &str) -> Result<i64, StartListError> {
        let cards: Vec<CardInfo> = self.fetch_collection("/cards/today").await?;
        let wanted = track_name.to_lowercase();

        let card_id = cards
            .iter()
            .filter(|card| card.track_name.to_lowercase() == wanted)
            .map(|card| card.card_id)
            .last()
            .ok_or_else(|| {
                StartListError::NotFound(format!("No card today for track {}", track_name))
            })?;

        tracing::info!("Resolved track {} to card {}", track_name, card_id);
        Ok(card_id)
    }

    /// Find the race id of a start number on a card
    pub async fn resolve_start_id(
        &self,
        card_id: i64,
        start_number: u32,
    ) -> Result<i64, StartListError> {
        let races: Vec<RaceInfo> = self
            .fetch_collection(&format!("/card/{}/races", card_id))
            .await?;

        let race_id = races
            .iter()
            .filter(|race| race.number == start_number)
            .map(|race| race.race_id)
            .last()
            .ok_or_else(|| {
                StartListError::NotFound(format!(
                    "No start {} on card {}",
                    start_number, card_id
                ))
            })?;

        tracing::info!("Resolved start {} to race {}", start_number, race_id);
        Ok(race_id)
    }

    /// Fetch the horses entered in a race, with normalized names
    pub async fn resolve_horses(&self, race_id: i64) -> Result<Vec<HorseEntry>, StartListError> {
        let runners: Vec<RunnerInfo> = self
            .fetch_collection(&format!("/race/{}/runners", race_id))
            .await?;

        if runners.is_empty() {
            return Err(StartListError::NotFound(format!(
                "No runners listed for race {}",
                race_id
            )));
        }

        let horses: Vec<HorseEntry> = runners
            .iter()
            .map(|runner| HorseEntry::new(runner.start_number, &runner.horse_name))
            .collect();

        tracing::info!("Found {} horses for race {}", horses.len(), race_id);
        Ok(horses)
    }

    /// GET a path and unwrap its `collection` field
    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, StartListError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        tracing::debug!("Fetching start list data from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(StartListError::ApiError(format!(
                "Failed to fetch {}: {}",
                path,
                response.status()
            )));
        }

        let body: Collection<T> = response
            .json()
            .await
            .map_err(|e| StartListError::InvalidResponse(format!("{}: {}", path, e)))?;

        body.collection
            .ok_or_else(|| StartListError::NotFound(format!("Missing collection in {}", path)))
    }
}
