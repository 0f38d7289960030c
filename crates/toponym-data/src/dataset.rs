use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::error::{DataError, Result};
use crate::record::{PlaceRecord, RawDataset};

/// Fixed per-record overhead used by [`Dataset::approx_memory_bytes`].
const RECORD_OVERHEAD_BYTES: usize = std::mem::size_of::<PlaceRecord>();

/// The loaded place records plus the coarse name mapping shipped with them.
///
/// Immutable once built. The engine derives its own name index from [`Dataset::records`]
/// and only reports on the bootstrap mapping.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<PlaceRecord>,
    bootstrap_index: HashMap<String, Vec<usize>>,
}

impl Dataset {
    /// Read and validate the optimized dataset at `path`.
    ///
    /// Files ending in `.gz` are decompressed on the fly when the `gzip` feature is enabled.
    #[instrument(name = "Load dataset", level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let t_load = std::time::Instant::now();

        let reader = open_stream(path)?;
        let dataset = Self::from_reader(reader)?;

        info!(
            records = dataset.len(),
            bootstrap_entries = dataset.bootstrap_index.len(),
            elapsed = ?t_load.elapsed(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse a dataset document from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let raw: RawDataset = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawDataset = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Validate every raw entry; a single bad record or dangling bootstrap position
    /// rejects the whole document.
    pub fn from_raw(raw: RawDataset) -> Result<Self> {
        let records = raw
            .cities
            .into_iter()
            .enumerate()
            .map(|(position, place)| PlaceRecord::from_raw(position, place))
            .collect::<Result<Vec<_>>>()?;

        let len = records.len();
        for (name, positions) in &raw.index {
            if let Some(&position) = positions.iter().find(|&&p| p >= len) {
                return Err(DataError::InvalidBootstrapIndex {
                    name: name.clone(),
                    position,
                    len,
                });
            }
        }

        Ok(Self {
            records,
            bootstrap_index: raw.index,
        })
    }

    /// Build a dataset from already validated records, deriving the bootstrap mapping
    /// from primary names the way the offline pipeline does.
    pub fn from_records(records: Vec<PlaceRecord>) -> Self {
        let mut bootstrap_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            bootstrap_index
                .entry(record.name.to_lowercase())
                .or_default()
                .push(position);
        }
        Self {
            records,
            bootstrap_index,
        }
    }

    /// Serialize back into the on-disk document shape.
    pub fn to_raw(&self) -> RawDataset {
        RawDataset {
            cities: self.records.iter().map(PlaceRecord::to_raw).collect(),
            index: self.bootstrap_index.clone(),
        }
    }

    pub fn records(&self) -> &[PlaceRecord] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&PlaceRecord> {
        self.records.get(position)
    }

    pub fn bootstrap_index(&self) -> &HashMap<String, Vec<usize>> {
        &self.bootstrap_index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rough resident size of the records: struct size plus owned string bytes.
    pub fn approx_memory_bytes(&self) -> usize {
        self.records
            .iter()
            .map(|r| {
                RECORD_OVERHEAD_BYTES
                    + r.name.len()
                    + r.country.len()
                    + r
                        .alternate_names
                        .iter()
                        .map(|a| a.len() + std::mem::size_of::<String>())
                        .sum::<usize>()
            })
            .sum()
    }
}

/// Opens a file, buffers it, and wraps it in a gzip decoder when the name ends in `.gz`.
fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Dataset file could not be opened");
        match e.kind() {
            std::io::ErrorKind::NotFound => DataError::DatasetNotFound(path.to_path_buf()),
            _ => DataError::Io(e),
        }
    })?;
    let reader = BufReader::new(file);

    let is_gzip = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    #[cfg(feature = "gzip")]
    {
        if is_gzip {
            return Ok(Box::new(BufReader::new(flate2::read::GzDecoder::new(reader))));
        }
    }
    #[cfg(not(feature = "gzip"))]
    {
        if is_gzip {
            warn!(path = %path.display(), "gzip feature disabled, reading .gz dataset as plain JSON");
        }
    }

    Ok(Box::new(reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SMALL: &str = r#"{
        "cities": [
            {"id": 3173435, "name": "Milano", "country": "IT", "lat": 45.46427, "lon": 9.18951,
             "pop": 1236837, "alternate_names": ["Milan", "Mailand"]},
            {"id": 4635031, "name": "Milan", "country": "US", "lat": 35.9198, "lon": -88.75895,
             "pop": 7851, "alternate_names": []}
        ],
        "index": {"milano": [0], "milan": [1]}
    }"#;

    #[test]
    fn test_from_json_str() {
        let dataset = Dataset::from_json_str(SMALL).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].name, "Milano");
        assert_eq!(dataset.bootstrap_index().get("milan"), Some(&vec![1]));
        assert!(dataset.approx_memory_bytes() > 0);
    }

    #[test]
    fn test_missing_cities_key_is_corrupt() {
        let err = Dataset::from_json_str(r#"{"index": {}}"#).unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }

    #[test]
    fn test_dangling_bootstrap_position_is_corrupt() {
        let json = r#"{"cities": [{"name": "Roma", "country": "IT", "lat": 41.9, "lon": 12.5}],
                       "index": {"roma": [0, 4]}}"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidBootstrapIndex {
                position: 4,
                len: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Dataset::load("/definitely/not/here/cities.json").unwrap_err();
        assert!(matches!(err, DataError::DatasetNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SMALL.as_bytes()).unwrap();
        file.flush().unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn test_load_gzip_file() {
        use flate2::{Compression, write::GzEncoder};

        let file = tempfile::Builder::new().suffix(".json.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(file.as_file(), Compression::default());
        encoder.write_all(SMALL.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].country, "US");
    }

    #[test]
    fn test_from_records_builds_bootstrap() {
        let records = vec![
            PlaceRecord::new("Rome", "US", 34.25, -85.16, 36_303, vec![]).unwrap(),
            PlaceRecord::new("Rome", "US", 43.21, -75.45, 32_573, vec![]).unwrap(),
        ];
        let dataset = Dataset::from_records(records);
        assert_eq!(dataset.bootstrap_index().get("rome"), Some(&vec![0, 1]));

        let reparsed = Dataset::from_raw(dataset.to_raw()).unwrap();
        assert_eq!(reparsed.records(), dataset.records());
    }
}
