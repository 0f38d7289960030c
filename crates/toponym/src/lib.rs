//! Toponym - Offline Place-Name Resolution
//!
//! Toponym resolves free-text place names to ranked candidate locations and coordinates to
//! nearby named places. Everything runs over a `GeoNames`-derived dataset held in memory:
//! no search engine, no database, no network.
//!
//! # Quick Start
//!
//! ```rust
//! use toponym::{Geocoder, ReverseOptions, SearchOptions};
//! use toponym::data::{TestDataConfig, create_test_dataset};
//!
//! // A small realistic dataset written to a temporary file
//! let file = create_test_dataset(&TestDataConfig::sample())?;
//! let geocoder = Geocoder::open(file.path())?;
//!
//! // Forward geocoding, Italian places first with the default locale profile
//! let response = geocoder.geocode("Milan", &SearchOptions::default());
//! let best = &response.results[0];
//! println!("{} ({:.2})", best.formatted, best.confidence);
//!
//! // Restrict to one country and a handful of results
//! let options = SearchOptions::builder().country("US").limit(3).build();
//! let response = geocoder.geocode("Milan", &options);
//! assert!(response.results.iter().all(|r| r.country == "US"));
//!
//! // Reverse geocoding
//! let nearby = geocoder.reverse_geocode(45.4642, 9.19, &ReverseOptions::with_radius(20.0));
//! assert!(nearby.success);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # How a forward query is answered
//!
//! 1. **Matching**: exact, prefix and substring lookups over an index of every primary and
//!    alternate name.
//! 2. **Ranking**: priority-country places first, then exact and prefix matches, then
//!    population plus a per-name boost.
//! 3. **Confidence**: an independent `[0, 1]` score per result.
//! 4. **Fallback**: when nothing is found the search is retried without a population floor,
//!    then worldwide. If that fails too, the response carries suggestions.
//!
//! The locale heuristics (priority country, boosts, aliases, suggestions) come from a
//! [`LocaleProfile`]; the bundled default favours Italy.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
pub mod error;
pub mod index;
mod response;
pub mod search;

pub use crate::core::Geocoder;

pub use config::{
    GeocoderBuilder, GeocoderConfig, LOCALE_PROFILE_ENV, LocaleProfile, ReverseOptions,
    SearchOptions, SearchOptionsBuilder,
};
pub use index::{IndexEntry, NameIndex, normalize};
pub use response::{
    Failure, FailureKind, GeocodeResponse, GeocoderStats, ReverseResponse, ReverseResult,
    SearchResult,
};
pub use search::{MatchTier, SearchStage, haversine_km};
pub use toponym_data as data;
pub use toponym_data::{DATASET_PATH_ENV, Dataset, PlaceRecord};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the toponym library.
///
/// Installs a `tracing` fmt subscriber. `RUST_LOG` overrides `level` when set.
/// Repeated calls are no-ops.
///
/// ```rust
/// use toponym::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), toponym::error::ToponymError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::ToponymError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?;

        // Another subscriber may already be installed by the host application.
        if let Err(e) = tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
        {
            tracing::debug!(error = %e, "Global subscriber already set, keeping it");
        }
        Ok(())
    })
}
