//! Dataset model and loader for the toponym engine.
//!
//! The engine consumes a single pre-built JSON document (produced offline from a
//! `GeoNames` dump) holding an ordered list of place records and a coarse
//! name -> position mapping. This crate owns the on-disk shape of that document,
//! validates it into [`PlaceRecord`]s and exposes it as an immutable [`Dataset`].
use once_cell::sync::Lazy;
use std::path::PathBuf;
use tracing::debug;

pub mod dataset;
pub mod record;
pub mod test_data;

pub const DATASET_PATH_DEFAULT: &str = "./geocoding/cities-optimized.json";
pub const DATASET_PATH_ENV: &str = "TOPONYM_DATASET";

/// Dataset path resolved once per process: `TOPONYM_DATASET` if set, else the default.
pub static DATASET_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let path = std::env::var(DATASET_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DATASET_PATH_DEFAULT), PathBuf::from);
    debug!(path = ?path, "Resolved dataset path");
    path
});

/// Path of the optimized dataset the engine should load when none is given explicitly.
pub fn default_dataset_path() -> PathBuf {
    DATASET_PATH.clone()
}

mod error {
    use std::path::PathBuf;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum DataError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("Malformed dataset JSON: {0}")]
        Json(#[from] serde_json::Error),
        #[error("Geocoding dataset not found at {}", .0.display())]
        DatasetNotFound(PathBuf),
        #[error("Invalid place record at position {position}: {reason}")]
        InvalidRecord { position: usize, reason: String },
        #[error(
            "Bootstrap index entry '{name}' points at position {position}, but the dataset has {len} records"
        )]
        InvalidBootstrapIndex {
            name: String,
            position: usize,
            len: usize,
        },
    }

    pub type Result<T> = std::result::Result<T, DataError>;
}

pub use dataset::Dataset;
pub use error::{DataError, Result};
pub use record::{PlaceRecord, RawDataset, RawPlace};
pub use test_data::{TestDataConfig, create_test_dataset, test_dataset, test_records};
