//! Structured results exchanged with callers.
//!
//! With the default `serialize` feature every type here serializes to the JSON shape an API
//! layer would return.

use std::path::PathBuf;

use toponym_data::PlaceRecord;

use crate::{error::ToponymError, search::SearchStage};

/// One ranked forward-search candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SearchResult {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
    /// `"<name>, <country>"`
    pub formatted: String,
    /// Relevance in `[0, 1]`, recomputed on every query
    pub confidence: f64,
    pub alternate_names: Vec<String>,
    /// The place belongs to the profile's priority country
    pub locale_match: bool,
}

impl SearchResult {
    pub(crate) fn from_record(record: &PlaceRecord, confidence: f64, locale_match: bool) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            country: record.country.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            population: record.population,
            formatted: record.formatted(),
            confidence,
            alternate_names: record.alternate_names.clone(),
            locale_match,
        }
    }
}

/// One reverse-lookup candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ReverseResult {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
    pub formatted: String,
    /// Great-circle distance from the query point
    pub distance_km: f64,
    pub locale_match: bool,
}

impl ReverseResult {
    pub(crate) fn from_record(record: &PlaceRecord, distance_km: f64, locale_match: bool) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            country: record.country.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            population: record.population,
            formatted: record.formatted(),
            distance_km,
            locale_match,
        }
    }
}

/// Machine-readable reason of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum FailureKind {
    NotLoaded,
    InvalidQuery,
    NoResults,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&ToponymError> for Failure {
    fn from(error: &ToponymError) -> Self {
        let kind = match error {
            ToponymError::NotLoaded | ToponymError::DatasetMissingOrCorrupt(_) => {
                FailureKind::NotLoaded
            }
            ToponymError::InvalidQuery(_) => FailureKind::InvalidQuery,
            ToponymError::NoResults { .. } => FailureKind::NoResults,
            _ => FailureKind::Internal,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// Outcome of a forward query.
///
/// `success == false` always comes with `error` set; `suggestions` is only filled when
/// every search stage came back empty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct GeocodeResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<SearchResult>,
    pub count: usize,
    /// Search stage that produced the results
    pub stage: Option<SearchStage>,
    pub error: Option<Failure>,
    pub suggestions: Vec<String>,
}

impl GeocodeResponse {
    pub(crate) fn found(query: &str, results: Vec<SearchResult>, stage: SearchStage) -> Self {
        Self {
            success: true,
            query: query.to_string(),
            count: results.len(),
            results,
            stage: Some(stage),
            error: None,
            suggestions: Vec::new(),
        }
    }

    pub(crate) fn failed(query: &str, error: &ToponymError, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            query: query.to_string(),
            results: Vec::new(),
            count: 0,
            stage: None,
            error: Some(error.into()),
            suggestions,
        }
    }
}

/// Outcome of a reverse query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ReverseResponse {
    pub success: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub results: Vec<ReverseResult>,
    pub count: usize,
    pub error: Option<Failure>,
}

impl ReverseResponse {
    pub(crate) fn found(
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        results: Vec<ReverseResult>,
    ) -> Self {
        Self {
            success: true,
            latitude,
            longitude,
            radius_km,
            count: results.len(),
            results,
            error: None,
        }
    }

    pub(crate) fn failed(latitude: f64, longitude: f64, radius_km: f64, error: &ToponymError) -> Self {
        Self {
            success: false,
            latitude,
            longitude,
            radius_km,
            results: Vec::new(),
            count: 0,
            error: Some(error.into()),
        }
    }
}

/// Snapshot of the engine state. Every count is zero while no dataset is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct GeocoderStats {
    pub loaded: bool,
    pub total_records: usize,
    /// Distinct country codes
    pub countries: usize,
    pub priority_locale: String,
    pub priority_locale_records: usize,
    pub total_population: u64,
    pub index_entries: usize,
    pub bootstrap_entries: usize,
    pub approx_memory_bytes: usize,
    /// Human label, e.g. `"~42 MB"`
    pub memory_usage: String,
    pub dataset_path: PathBuf,
}

/// `"~N MB"`, rounded to the nearest mebibyte.
pub(crate) fn memory_label(bytes: usize) -> String {
    format!("~{} MB", (bytes as f64 / (1024.0 * 1024.0)).round())
}
