use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{DataError, Result};

/// Raw place entry exactly as the offline pipeline writes it.
///
/// NOTE: Field names mirror the external dataset (`lat`, `lon`, `pop`), we never expose this
/// type from the engine API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub pop: Option<u64>,
    #[serde(default)]
    pub alternate_names: Option<Vec<Option<String>>>,
}

/// The optimized dataset document: `{"cities": [...], "index": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDataset {
    pub cities: Vec<RawPlace>,
    /// Coarse lower-cased name -> record positions mapping. Only used as a bootstrap.
    #[serde(default)]
    pub index: HashMap<String, Vec<usize>>,
}

/// One named place, validated and immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    /// Identifier carried by the source dataset (0 when absent).
    pub id: u64,
    pub name: String,
    /// ISO 3166-1 alpha-2 country code as stored in the dataset.
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
    /// Alternate names in dataset order. May be empty, never contains blank entries.
    pub alternate_names: Vec<String>,
}

impl PlaceRecord {
    /// Build a record, rejecting invalid coordinates and blank names or country codes.
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
        population: u64,
        alternate_names: Vec<String>,
    ) -> Result<Self> {
        Self::from_raw(
            0,
            RawPlace {
                id: None,
                name: name.into(),
                country: country.into(),
                lat: latitude,
                lon: longitude,
                pop: Some(population),
                alternate_names: Some(alternate_names.into_iter().map(Some).collect()),
            },
        )
    }

    /// Validate a raw entry found at `position` in the record sequence.
    pub fn from_raw(position: usize, raw: RawPlace) -> Result<Self> {
        let invalid = |reason: String| DataError::InvalidRecord { position, reason };

        let name = raw.name.trim();
        if name.is_empty() {
            return Err(invalid("empty primary name".to_string()));
        }
        let country = raw.country.trim();
        if country.is_empty() {
            return Err(invalid(format!("empty country code for '{name}'")));
        }
        if !raw.lat.is_finite() || !(-90.0..=90.0).contains(&raw.lat) {
            return Err(invalid(format!("latitude {} out of range", raw.lat)));
        }
        if !raw.lon.is_finite() || !(-180.0..=180.0).contains(&raw.lon) {
            return Err(invalid(format!("longitude {} out of range", raw.lon)));
        }

        let alternate_names = raw
            .alternate_names
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|alt| alt.trim().to_string())
            .filter(|alt| !alt.is_empty())
            .collect();

        Ok(Self {
            id: raw.id.unwrap_or_default(),
            name: name.to_string(),
            country: country.to_string(),
            latitude: raw.lat,
            longitude: raw.lon,
            population: raw.pop.unwrap_or_default(),
            alternate_names,
        })
    }

    /// Convert back into the on-disk shape.
    pub fn to_raw(&self) -> RawPlace {
        RawPlace {
            id: Some(self.id),
            name: self.name.clone(),
            country: self.country.clone(),
            lat: self.latitude,
            lon: self.longitude,
            pop: Some(self.population),
            alternate_names: Some(self.alternate_names.iter().cloned().map(Some).collect()),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Primary name followed by every alternate name.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alternate_names.iter().map(String::as_str))
    }

    /// `"<name>, <country>"`, the label shown to callers.
    pub fn formatted(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Case-insensitive country check, surrounding whitespace in `iso` is ignored.
    pub fn is_in_country(&self, iso: &str) -> bool {
        self.country.eq_ignore_ascii_case(iso.trim())
    }
}
