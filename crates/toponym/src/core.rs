//! The [`Geocoder`]: an explicitly owned engine instance.
//!
//! A geocoder starts empty, becomes ready after a successful [`Geocoder::load`], and can be
//! reloaded at any time. The dataset and its name index live together in one immutable
//! snapshot that is swapped atomically, so a query always sees a matching pair.
//!
//! ```rust
//! use toponym::{Geocoder, SearchOptions, data::{TestDataConfig, create_test_dataset}};
//!
//! let file = create_test_dataset(&TestDataConfig::sample())?;
//! let geocoder = Geocoder::open(file.path())?;
//!
//! let response = geocoder.geocode("Milano", &SearchOptions::default());
//! assert!(response.success);
//! assert_eq!(response.results[0].country, "IT");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{path::Path, sync::Arc};

use itertools::Itertools;
use parking_lot::RwLock;
use toponym_data::Dataset;
use tracing::{info, instrument, warn};

use crate::{
    config::{GeocoderConfig, ReverseOptions, SearchOptions},
    error::{Result, ToponymError},
    index::{NameIndex, is_searchable, normalize},
    response::{
        GeocodeResponse, GeocoderStats, ReverseResponse, ReverseResult, SearchResult,
        memory_label,
    },
    search::{
        SearchStage, confidence, nearby, search_stage, search_with_fallback, suggest,
    },
};

/// Dataset and name index built from the same load.
#[derive(Debug)]
struct Snapshot {
    dataset: Dataset,
    index: NameIndex,
}

impl Snapshot {
    fn new(dataset: Dataset) -> Self {
        let index = NameIndex::build(dataset.records());
        Self { dataset, index }
    }
}

/// Forward and reverse place-name resolution over an in-memory dataset.
///
/// `Geocoder` is `Send + Sync`; share it behind an `Arc` and query from any thread.
/// Queries clone the current snapshot handle and never hold the lock while searching.
///
/// ```rust,no_run
/// use toponym::{Geocoder, GeocoderConfig, ReverseOptions};
///
/// let geocoder = Geocoder::new(GeocoderConfig::from_env()?);
/// geocoder.load()?;
///
/// let nearby = geocoder.reverse_geocode(45.4642, 9.19, &ReverseOptions::with_radius(20.0));
/// println!("{} places nearby", nearby.count);
/// # Ok::<(), toponym::error::ToponymError>(())
/// ```
#[derive(Debug)]
pub struct Geocoder {
    config: GeocoderConfig,
    state: RwLock<Option<Arc<Snapshot>>>,
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new(GeocoderConfig::default())
    }
}

impl Geocoder {
    /// An unloaded geocoder; call [`Geocoder::load`] before querying.
    pub fn new(config: GeocoderConfig) -> Self {
        Self {
            config,
            state: RwLock::new(None),
        }
    }

    /// Default configuration with the given dataset path, loaded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let config = GeocoderConfig::builder()
            .dataset_path(path.as_ref())
            .build()?;
        let geocoder = Self::new(config);
        geocoder.load()?;
        Ok(geocoder)
    }

    /// A ready geocoder over an in-memory dataset.
    pub fn from_dataset(config: GeocoderConfig, dataset: Dataset) -> Self {
        let geocoder = Self::new(config);
        geocoder.swap(Some(Arc::new(Snapshot::new(dataset))));
        geocoder
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// (Re)load the configured dataset and rebuild the name index.
    ///
    /// On failure the geocoder is left unloaded and every query reports
    /// [`ToponymError::NotLoaded`] until a later load succeeds.
    #[instrument(name = "Load geocoder", level = "info", skip(self), fields(path = %self.config.dataset_path.display()))]
    pub fn load(&self) -> Result<()> {
        let t_load = std::time::Instant::now();
        match Dataset::load(&self.config.dataset_path) {
            Ok(dataset) => {
                let snapshot = Snapshot::new(dataset);
                info!(
                    records = snapshot.dataset.len(),
                    index_entries = snapshot.index.len(),
                    elapsed = ?t_load.elapsed(),
                    "Geocoder ready"
                );
                self.swap(Some(Arc::new(snapshot)));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load geocoding dataset");
                self.swap(None);
                Err(e.into())
            }
        }
    }

    /// Replace the loaded state with an in-memory dataset.
    pub fn load_dataset(&self, dataset: Dataset) {
        self.swap(Some(Arc::new(Snapshot::new(dataset))));
    }

    /// Drop the loaded dataset.
    pub fn unload(&self) {
        self.swap(None);
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().is_some()
    }

    fn swap(&self, snapshot: Option<Arc<Snapshot>>) {
        *self.state.write() = snapshot;
    }

    fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.state.read().clone().ok_or(ToponymError::NotLoaded)
    }

    fn query_key(query: &str, options: &SearchOptions) -> Result<String> {
        options.validate()?;
        let key = normalize(query);
        if !is_searchable(&key) {
            return Err(ToponymError::InvalidQuery(format!(
                "query '{}' must have at least 2 characters",
                query.trim()
            )));
        }
        Ok(key)
    }

    fn to_results(&self, snapshot: &Snapshot, query_key: &str, positions: &[usize]) -> Vec<SearchResult> {
        let profile = &self.config.profile;
        positions
            .iter()
            .map(|&p| {
                let record = &snapshot.dataset.records()[p];
                SearchResult::from_record(
                    record,
                    confidence(query_key, record, profile),
                    profile.is_priority_country(&record.country),
                )
            })
            .collect()
    }

    /// One match-and-rank pass with the given options, no fallback.
    ///
    /// An empty vector means nothing matched these options.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let snapshot = self.snapshot()?;
        let key = Self::query_key(query, options)?;
        let positions = search_stage(
            &snapshot.dataset,
            &snapshot.index,
            &key,
            options,
            &self.config.profile,
        );
        Ok(self.to_results(&snapshot, &key, &positions))
    }

    /// Full forward pipeline, failing with [`ToponymError::NoResults`] when every stage is empty.
    pub fn search_with_fallback(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<(SearchStage, Vec<SearchResult>)> {
        let snapshot = self.snapshot()?;
        let key = Self::query_key(query, options)?;
        let staged = search_with_fallback(
            &snapshot.dataset,
            &snapshot.index,
            &key,
            options,
            &self.config.profile,
            self.config.fallback_min_population,
        );
        match staged.stage {
            Some(stage) => Ok((stage, self.to_results(&snapshot, &key, &staged.positions))),
            None => Err(ToponymError::NoResults {
                query: query.to_string(),
            }),
        }
    }

    /// Forward geocoding; failures are reported in the response, never as `Err`.
    pub fn geocode(&self, query: &str, options: &SearchOptions) -> GeocodeResponse {
        match self.search_with_fallback(query, options) {
            Ok((stage, results)) => GeocodeResponse::found(query, results, stage),
            Err(e @ ToponymError::NoResults { .. }) => {
                let suggestions = suggest(query, &self.config.profile);
                info!(query, suggestions = %suggestions.iter().join(" | "), "No results, offering suggestions");
                GeocodeResponse::failed(query, &e, suggestions)
            }
            Err(e) => {
                warn!(query, error = %e, "Geocoding failed");
                GeocodeResponse::failed(query, &e, Vec::new())
            }
        }
    }

    /// Places around a coordinate, failing with [`ToponymError::NoResults`] when none lies
    /// within the radius.
    pub fn reverse_candidates(
        &self,
        latitude: f64,
        longitude: f64,
        options: &ReverseOptions,
    ) -> Result<Vec<ReverseResult>> {
        let snapshot = self.snapshot()?;
        let radius_km = self.radius(options);
        validate_point(latitude, longitude, radius_km)?;

        let profile = &self.config.profile;
        let hits = nearby(
            snapshot.dataset.records(),
            latitude,
            longitude,
            radius_km,
            options.prioritize_locale,
            self.config.reverse_max_results,
            profile,
        );
        if hits.is_empty() {
            return Err(ToponymError::NoResults {
                query: format!("{latitude},{longitude} within {radius_km} km"),
            });
        }

        Ok(hits
            .iter()
            .map(|hit| {
                let record = &snapshot.dataset.records()[hit.position];
                ReverseResult::from_record(
                    record,
                    hit.distance_km,
                    profile.is_priority_country(&record.country),
                )
            })
            .collect())
    }

    /// Reverse geocoding; failures are reported in the response, never as `Err`.
    pub fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
        options: &ReverseOptions,
    ) -> ReverseResponse {
        let radius_km = self.radius(options);
        match self.reverse_candidates(latitude, longitude, options) {
            Ok(results) => ReverseResponse::found(latitude, longitude, radius_km, results),
            Err(e) => {
                warn!(latitude, longitude, radius_km, error = %e, "Reverse geocoding failed");
                ReverseResponse::failed(latitude, longitude, radius_km, &e)
            }
        }
    }

    fn radius(&self, options: &ReverseOptions) -> f64 {
        options.radius_km.unwrap_or(self.config.default_radius_km)
    }

    /// Counts describing the loaded dataset; all zero when unloaded.
    pub fn stats(&self) -> GeocoderStats {
        let mut stats = GeocoderStats {
            priority_locale: self.config.profile.priority_country().to_string(),
            dataset_path: self.config.dataset_path.clone(),
            memory_usage: memory_label(0),
            ..GeocoderStats::default()
        };
        let Ok(snapshot) = self.snapshot() else {
            return stats;
        };

        let records = snapshot.dataset.records();
        let approx_memory_bytes =
            snapshot.dataset.approx_memory_bytes() + snapshot.index.approx_memory_bytes();

        stats.loaded = true;
        stats.total_records = records.len();
        stats.countries = records.iter().map(|r| r.country.as_str()).unique().count();
        stats.priority_locale_records = records
            .iter()
            .filter(|r| self.config.profile.is_priority_country(&r.country))
            .count();
        stats.total_population = records.iter().map(|r| r.population).sum();
        stats.index_entries = snapshot.index.len();
        stats.bootstrap_entries = snapshot.dataset.bootstrap_index().len();
        stats.approx_memory_bytes = approx_memory_bytes;
        stats.memory_usage = memory_label(approx_memory_bytes);
        stats
    }
}

fn validate_point(latitude: f64, longitude: f64, radius_km: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ToponymError::InvalidQuery(format!(
            "latitude {latitude} out of range"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ToponymError::InvalidQuery(format!(
            "longitude {longitude} out of range"
        )));
    }
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(ToponymError::InvalidQuery(format!(
            "radius must be a positive number of kilometres, got {radius_km}"
        )));
    }
    Ok(())
}
