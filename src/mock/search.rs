//! Simulated parking search backend
//!
//! Filters the dataset by a location keyword, falls back to the whole dataset
//! when nothing matches, then returns a random sample of 3-5 spaces as
//! GeoJSON after an artificial delay.

use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngExt, SeedableRng};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::dataset;
use crate::config::SearchConfig;
use crate::geo::geojson::{DEFAULT_COLLECTION_NAME, FeatureCollection, to_feature_collection};
use crate::models::{ParkingSpace, SearchRequest};
use crate::search::SearchBackend;

/// Runtime knobs for the mock service
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Delay before a response is delivered
    pub latency: Duration,
    /// Inclusive bounds for the number of returned spaces
    pub min_results: usize,
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(400),
            min_results: 3,
            max_results: 5,
        }
    }
}

impl SearchSettings {
    /// Settings for tests and scripted runs: no delay
    #[must_use]
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
            ..Self::default()
        }
    }

    fn result_range(&self) -> RangeInclusive<usize> {
        self.min_results..=self.max_results.max(self.min_results)
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.latency_ms),
            min_results: config.min_results,
            max_results: config.max_results,
        }
    }
}

/// In-process stand-in for the parking search API
pub struct MockSearchService {
    spaces: Vec<ParkingSpace>,
    settings: SearchSettings,
    rng: Mutex<StdRng>,
}

impl MockSearchService {
    /// Service over the built-in dataset with a randomly seeded generator
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        let seed: u64 = rand::rng().random();
        Self::with_seed(settings, seed)
    }

    /// Deterministic service; equal seeds give equal result sequences
    #[must_use]
    pub fn with_seed(settings: SearchSettings, seed: u64) -> Self {
        Self {
            spaces: dataset::parking_spaces(),
            settings,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Build from configuration, honouring an optional fixed seed
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        let settings = SearchSettings::from(config);
        match config.seed {
            Some(seed) => Self::with_seed(settings, seed),
            None => Self::new(settings),
        }
    }

    /// Replace the backing dataset
    #[must_use]
    pub fn with_spaces(mut self, spaces: Vec<ParkingSpace>) -> Self {
        self.spaces = spaces;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Run a search. Time bounds are logged but not validated.
    #[instrument(skip(self, request), fields(location = %request.location))]
    pub async fn search(&self, request: &SearchRequest) -> FeatureCollection {
        info!("Parking search request for window {}", request.window());

        let selected = {
            let mut rng = self.rng.lock().await;
            select_spaces(
                &self.spaces,
                &request.location,
                self.settings.result_range(),
                &mut rng,
            )
        };

        if !self.settings.latency.is_zero() {
            tokio::time::sleep(self.settings.latency).await;
        }

        info!("Returning {} parking spaces in GeoJSON format", selected.len());
        to_feature_collection(&selected, DEFAULT_COLLECTION_NAME)
    }
}

#[async_trait]
impl SearchBackend for MockSearchService {
    async fn fetch(&self, request: &SearchRequest) -> crate::Result<Value> {
        Ok(serde_json::to_value(self.search(request).await)?)
    }
}

/// Spaces whose name or address contains `location`, or the whole set when
/// the keyword is empty or matches nothing
#[must_use]
pub fn candidates<'a>(spaces: &'a [ParkingSpace], location: &str) -> Vec<&'a ParkingSpace> {
    let matched: Vec<&ParkingSpace> = if location.is_empty() {
        Vec::new()
    } else {
        spaces.iter().filter(|s| s.matches_keyword(location)).collect()
    };

    if matched.is_empty() {
        debug!("No matches found for location, using all spaces");
        spaces.iter().collect()
    } else {
        matched
    }
}

/// Shuffle the candidates and keep a random count drawn from `count_range`,
/// capped at the number of candidates
pub fn select_spaces(
    spaces: &[ParkingSpace],
    location: &str,
    count_range: RangeInclusive<usize>,
    rng: &mut StdRng,
) -> Vec<ParkingSpace> {
    let mut pool = candidates(spaces, location);
    pool.shuffle(rng);
    let count = rng.random_range(count_range).min(pool.len());
    pool.into_iter().take(count).cloned().collect()
}
