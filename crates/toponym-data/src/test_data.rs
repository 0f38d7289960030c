use std::io::Write;

use tempfile::NamedTempFile;
use tracing::info;

use super::error::Result;
use crate::dataset::Dataset;
use crate::record::PlaceRecord;

/// Configuration for test data generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Number of place records to include (capped at the size of the built-in table)
    pub records: usize,
    /// Whether to use realistic data or minimal test data
    pub realistic_data: bool,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self {
            records: usize::MAX,
            realistic_data: true,
        }
    }
}

impl TestDataConfig {
    /// Minimal data for unit tests
    pub fn minimal() -> Self {
        Self {
            records: MINIMAL_PLACES.len(),
            realistic_data: false,
        }
    }

    /// Sample data for integration tests
    pub fn sample() -> Self {
        Self::default()
    }
}

type PlaceRow = (
    u64,
    &'static str,
    &'static str,
    f64,
    f64,
    u64,
    &'static [&'static str],
);

const MINIMAL_PLACES: &[PlaceRow] = &[
    (
        3173435,
        "Milano",
        "IT",
        45.46427,
        9.18951,
        1236837,
        &["Milan", "Mailand", "Milán"],
    ),
    (4635031, "Milan", "US", 35.9198, -88.75895, 7851, &[]),
    (
        3169070,
        "Roma",
        "IT",
        41.89193,
        12.51133,
        2318895,
        &["Rome", "Rom"],
    ),
    (4219762, "Rome", "US", 34.25704, -85.16467, 36303, &[]),
    (
        2988507,
        "Paris",
        "FR",
        48.85341,
        2.3488,
        2138551,
        &["Parigi", "Parijs"],
    ),
];

// Realistic data: a slice of cities1000 centred on northern Italy plus same-named
// places elsewhere, so locale priority and country filters have something to do.
const REALISTIC_PLACES: &[PlaceRow] = &[
    (
        3173435,
        "Milano",
        "IT",
        45.46427,
        9.18951,
        1236837,
        &["Milan", "Mailand", "Milán", "Milanu", "Mediolanum"],
    ),
    (4635031, "Milan", "US", 35.9198, -88.75895, 7851, &[]),
    (5001929, "Milan", "US", 42.08532, -83.68522, 5836, &[]),
    (
        3173529,
        "Milano Marittima",
        "IT",
        44.27368,
        12.34752,
        1550,
        &[],
    ),
    (
        3169070,
        "Roma",
        "IT",
        41.89193,
        12.51133,
        2318895,
        &["Rome", "Rom", "Rzym"],
    ),
    (4219762, "Rome", "US", 34.25704, -85.16467, 36303, &[]),
    (5134295, "Rome", "US", 43.21285, -75.45573, 32573, &[]),
    (
        3172394,
        "Napoli",
        "IT",
        40.85216,
        14.26811,
        909048,
        &["Naples", "Neapel", "Nàpule"],
    ),
    (4165565, "Naples", "US", 26.14234, -81.79596, 22088, &[]),
    (
        3165524,
        "Torino",
        "IT",
        45.07049,
        7.68682,
        870456,
        &["Turin", "Turín"],
    ),
    (
        3176959,
        "Firenze",
        "IT",
        43.77925,
        11.24626,
        349296,
        &["Florence", "Florenz", "Florencia"],
    ),
    (4061234, "Florence", "US", 34.79981, -87.67725, 40428, &[]),
    (
        3181928,
        "Bologna",
        "IT",
        44.49381,
        11.33875,
        366133,
        &["Bolonia", "Bologne"],
    ),
    (
        3176219,
        "Genova",
        "IT",
        44.40478,
        8.94439,
        580223,
        &["Genoa", "Genua", "Gênes"],
    ),
    (
        3164603,
        "Venezia",
        "IT",
        45.43713,
        12.33265,
        51298,
        &["Venice", "Venedig", "Venise"],
    ),
    (4176380, "Venice", "US", 27.09978, -82.45426, 23670, &[]),
    (2523920, "Palermo", "IT", 38.13205, 13.33561, 668405, &["Palermu"]),
    (2525068, "Catania", "IT", 37.49223, 15.07041, 290927, &[]),
    (3182351, "Bari", "IT", 41.12066, 16.86982, 277387, &[]),
    (2524170, "Messina", "IT", 38.19394, 15.55256, 219948, &[]),
    (3164527, "Verona", "IT", 45.4299, 10.98444, 255588, &["Vérone"]),
    (5278052, "Verona", "US", 42.99083, -89.53318, 13474, &[]),
    (3165185, "Trieste", "IT", 45.64953, 13.77678, 204338, &["Triest", "Trst"]),
    (3171728, "Padova", "IT", 45.40797, 11.88586, 214000, &["Padua", "Padoue"]),
    (3181554, "Brescia", "IT", 45.53558, 10.21472, 196058, &["Brèsa"]),
    (3172629, "Monza", "IT", 45.58005, 9.27246, 119856, &[]),
    (
        3166850,
        "Sesto San Giovanni",
        "IT",
        45.53329,
        9.22585,
        81130,
        &[],
    ),
    (
        3178957,
        "Cinisello Balsamo",
        "IT",
        45.55823,
        9.21495,
        74150,
        &[],
    ),
    (3169561, "Rho", "IT", 45.52787, 9.04005, 50686, &[]),
    (3181631, "Bresso", "IT", 45.53758, 9.18973, 26255, &[]),
    (
        2988507,
        "Paris",
        "FR",
        48.85341,
        2.3488,
        2138551,
        &["Parigi", "Parijs", "Paryż"],
    ),
    (4717560, "Paris", "US", 33.66094, -95.55551, 24782, &[]),
    (
        2643743,
        "London",
        "GB",
        51.50853,
        -0.12574,
        8961989,
        &["Londra", "Londres", "Londen"],
    ),
    (
        2950159,
        "Berlin",
        "DE",
        52.52437,
        13.41053,
        3426354,
        &["Berlino", "Berlín"],
    ),
    (
        2867714,
        "München",
        "DE",
        48.13743,
        11.57549,
        1260391,
        &["Munich", "Monaco di Baviera", "Muenchen"],
    ),
    (
        2761369,
        "Wien",
        "AT",
        48.20849,
        16.37208,
        1691468,
        &["Vienna", "Vienne", "Viena"],
    ),
    (2657896, "Zürich", "CH", 47.36667, 8.55, 341730, &["Zurich", "Zurigo"]),
    (2659836, "Lugano", "CH", 46.01008, 8.96004, 63185, &[]),
    (
        3117735,
        "Madrid",
        "ES",
        40.4165,
        -3.70256,
        3255944,
        &["Madrid City"],
    ),
    (
        1850147,
        "Tokyo",
        "JP",
        35.6895,
        139.69171,
        8336599,
        &["Tokio", "Tōkyō"],
    ),
    (
        5128581,
        "New York City",
        "US",
        40.71427,
        -74.00597,
        8804190,
        &["New York", "NYC", "Nueva York"],
    ),
    (3448439, "São Paulo", "BR", -23.5475, -46.63611, 10021295, &["Sao Paulo"]),
    (2147714, "Sydney", "AU", -33.86785, 151.20732, 4627345, &[]),
    // Unknown population, as in the raw dump.
    (3175384, "Isola", "IT", 46.2037, 9.53512, 0, &[]),
];

fn rows(config: &TestDataConfig) -> &'static [PlaceRow] {
    let table = if config.realistic_data {
        REALISTIC_PLACES
    } else {
        MINIMAL_PLACES
    };
    &table[..config.records.min(table.len())]
}

/// Build the configured test records in memory.
pub fn test_records(config: &TestDataConfig) -> Result<Vec<PlaceRecord>> {
    rows(config)
        .iter()
        .map(|&(id, name, country, lat, lon, pop, alts)| {
            PlaceRecord::new(
                name,
                country,
                lat,
                lon,
                pop,
                alts.iter().map(ToString::to_string).collect(),
            )
            .map(|record| record.with_id(id))
        })
        .collect()
}

/// Build the configured test dataset in memory.
pub fn test_dataset(config: &TestDataConfig) -> Result<Dataset> {
    test_records(config).map(Dataset::from_records)
}

/// Create a test dataset document in a temporary file.
///
/// The file holds the same `{"cities": [...], "index": {...}}` shape the engine loads
/// in production and lives as long as the returned handle.
pub fn create_test_dataset(config: &TestDataConfig) -> Result<NamedTempFile> {
    info!("Creating test dataset with config: {:?}", config);

    let dataset = test_dataset(config)?;
    let mut file = tempfile::Builder::new()
        .prefix("toponym-")
        .suffix(".json")
        .tempfile()?;
    serde_json::to_writer(&mut file, &dataset.to_raw())?;
    file.flush()?;
    Ok(file)
}
