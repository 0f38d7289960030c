//! Engine and per-query configuration.

use std::path::{Path, PathBuf};

use tracing::debug;

pub use profile::LocaleProfile;

use crate::error::{Result, ToponymError};

mod profile;

pub const LOCALE_PROFILE_ENV: &str = "TOPONYM_LOCALE_PROFILE";

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_FALLBACK_MIN_POPULATION: u64 = 50_000;
pub const DEFAULT_REVERSE_MAX_RESULTS: usize = 8;
/// Hard cap on reverse lookup results.
pub const MAX_REVERSE_RESULTS: usize = 8;
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Options of a single forward search.
///
/// ```rust
/// use toponym::SearchOptions;
///
/// let options = SearchOptions::builder()
///     .limit(3)
///     .country("IT")
///     .min_population(10_000)
///     .build();
/// assert_eq!(options.limit, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results, must be positive
    pub limit: usize,
    /// ISO country code, compared case-insensitively
    pub country: Option<String>,
    /// Minimum population, 0 disables the filter
    pub min_population: u64,
    /// Only consider exact name matches
    pub exact_only: bool,
    /// Sort places of the profile's priority country first
    pub prioritize_locale: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            country: None,
            min_population: 0,
            exact_only: false,
            prioritize_locale: true,
        }
    }
}

impl SearchOptions {
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(ToponymError::InvalidQuery(
                "limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`SearchOptions`] with a couple of presets.
#[derive(Debug, Clone, Default)]
pub struct SearchOptionsBuilder {
    options: SearchOptions,
}

impl SearchOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact name matches only, few results
    pub fn exact() -> Self {
        Self::new().exact_only(true).limit(5)
    }

    /// Worldwide search without locale priority, restricted to sizeable places
    pub fn global() -> Self {
        Self::new()
            .prioritize_locale(false)
            .min_population(DEFAULT_FALLBACK_MIN_POPULATION)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.options.limit = limit;
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        let country = country.into();
        self.options.country = (!country.trim().is_empty()).then(|| country.trim().to_string());
        self
    }

    pub fn min_population(mut self, min_population: u64) -> Self {
        self.options.min_population = min_population;
        self
    }

    pub fn exact_only(mut self, exact_only: bool) -> Self {
        self.options.exact_only = exact_only;
        self
    }

    pub fn prioritize_locale(mut self, enabled: bool) -> Self {
        self.options.prioritize_locale = enabled;
        self
    }

    pub fn build(self) -> SearchOptions {
        self.options
    }
}

/// Options of a single reverse lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseOptions {
    /// Search radius in kilometres; `None` uses the engine default
    pub radius_km: Option<f64>,
    pub prioritize_locale: bool,
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self {
            radius_km: None,
            prioritize_locale: true,
        }
    }
}

impl ReverseOptions {
    pub fn with_radius(radius_km: f64) -> Self {
        Self {
            radius_km: Some(radius_km),
            ..Self::default()
        }
    }

    pub fn prioritize_locale(mut self, enabled: bool) -> Self {
        self.prioritize_locale = enabled;
        self
    }
}

/// Engine-wide configuration, fixed for the lifetime of a [`crate::Geocoder`].
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Dataset file read by [`crate::Geocoder::load`]
    pub dataset_path: PathBuf,
    pub profile: LocaleProfile,
    /// Population floor of the last, global fallback stage
    pub fallback_min_population: u64,
    /// Cap on reverse lookup results, at most [`MAX_REVERSE_RESULTS`]
    pub reverse_max_results: usize,
    /// Radius used when a reverse lookup does not give one
    pub default_radius_km: f64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            dataset_path: toponym_data::default_dataset_path(),
            profile: LocaleProfile::default(),
            fallback_min_population: DEFAULT_FALLBACK_MIN_POPULATION,
            reverse_max_results: DEFAULT_REVERSE_MAX_RESULTS,
            default_radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl GeocoderConfig {
    pub fn builder() -> GeocoderBuilder {
        GeocoderBuilder::default()
    }

    /// Defaults, with the locale profile taken from `TOPONYM_LOCALE_PROFILE` when set.
    pub fn from_env() -> Result<Self> {
        let mut builder = GeocoderBuilder::new();
        if let Ok(path) = std::env::var(LOCALE_PROFILE_ENV) {
            debug!(path = %path, "Using locale profile from environment");
            builder = builder.profile_from_path(path)?;
        }
        builder.build()
    }
}

/// Builder for [`GeocoderConfig`].
///
/// ```rust
/// use toponym::{GeocoderConfig, LocaleProfile};
///
/// let config = GeocoderConfig::builder()
///     .dataset_path("./geocoding/cities-optimized.json")
///     .profile(LocaleProfile::new("FR").with_boost("paris", 1_000_000))
///     .reverse_max_results(5)
///     .build()?;
/// assert_eq!(config.profile.priority_country(), "FR");
/// # Ok::<(), toponym::error::ToponymError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeocoderBuilder {
    config: GeocoderConfig,
}

impl GeocoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dataset_path = path.into();
        self
    }

    pub fn profile(mut self, profile: LocaleProfile) -> Self {
        self.config.profile = profile;
        self
    }

    /// Load the locale profile from a JSON file
    pub fn profile_from_path(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.config.profile = LocaleProfile::from_path(path)?;
        Ok(self)
    }

    pub fn fallback_min_population(mut self, population: u64) -> Self {
        self.config.fallback_min_population = population;
        self
    }

    pub fn reverse_max_results(mut self, max: usize) -> Self {
        self.config.reverse_max_results = max;
        self
    }

    pub fn default_radius_km(mut self, radius_km: f64) -> Self {
        self.config.default_radius_km = radius_km;
        self
    }

    pub fn build(self) -> Result<GeocoderConfig> {
        let config = self.config;
        if !(1..=MAX_REVERSE_RESULTS).contains(&config.reverse_max_results) {
            return Err(ToponymError::ConfigError(format!(
                "reverse_max_results must be between 1 and {MAX_REVERSE_RESULTS}, got {}",
                config.reverse_max_results
            )));
        }
        if !config.default_radius_km.is_finite() || config.default_radius_km <= 0.0 {
            return Err(ToponymError::ConfigError(format!(
                "default_radius_km must be a positive number, got {}",
                config.default_radius_km
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.limit, 10);
        assert_eq!(options.country, None);
        assert_eq!(options.min_population, 0);
        assert!(!options.exact_only);
        assert!(options.prioritize_locale);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_search_options_presets() {
        let exact = SearchOptionsBuilder::exact().build();
        assert!(exact.exact_only);
        assert_eq!(exact.limit, 5);

        let global = SearchOptionsBuilder::global().limit(20).build();
        assert!(!global.prioritize_locale);
        assert_eq!(global.min_population, 50_000);
        assert_eq!(global.limit, 20);
    }

    #[test]
    fn test_blank_country_means_no_filter() {
        assert_eq!(SearchOptions::builder().country("  ").build().country, None);
        assert_eq!(
            SearchOptions::builder().country(" it ").build().country.as_deref(),
            Some("it")
        );
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let options = SearchOptions::builder().limit(0).build();
        assert!(matches!(
            options.validate(),
            Err(ToponymError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_geocoder_builder_validation() {
        let config = GeocoderConfig::builder()
            .fallback_min_population(100_000)
            .build()
            .unwrap();
        assert_eq!(config.fallback_min_population, 100_000);
        assert_eq!(config.reverse_max_results, 8);
        assert!((config.default_radius_km - 50.0).abs() < f64::EPSILON);

        assert!(matches!(
            GeocoderConfig::builder().reverse_max_results(0).build(),
            Err(ToponymError::ConfigError(_))
        ));
        assert!(matches!(
            GeocoderConfig::builder().reverse_max_results(9).build(),
            Err(ToponymError::ConfigError(_))
        ));
        assert_eq!(
            GeocoderConfig::builder()
                .reverse_max_results(MAX_REVERSE_RESULTS)
                .build()
                .unwrap()
                .reverse_max_results,
            8
        );
        assert!(matches!(
            GeocoderConfig::builder().default_radius_km(-1.0).build(),
            Err(ToponymError::ConfigError(_))
        ));
        assert!(matches!(
            GeocoderConfig::builder().default_radius_km(f64::NAN).build(),
            Err(ToponymError::ConfigError(_))
        ));
    }
}
