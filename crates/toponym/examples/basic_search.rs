//! Basic forward geocoding
//!
//! This example demonstrates the fundamental search operations:
//! - Opening a geocoder over a dataset file
//! - Simple place-name lookups
//! - Country filters, limits and the failure path
//!
//! Set `TOPONYM_DATASET` to use a real optimized dataset; otherwise a small sample is
//! generated in a temporary file.

use tempfile::NamedTempFile;
use toponym::{
    DATASET_PATH_ENV, GeocodeResponse, Geocoder, SearchOptions,
    data::{TestDataConfig, create_test_dataset},
};

fn open_geocoder() -> Result<(Geocoder, Option<NamedTempFile>), Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var(DATASET_PATH_ENV) {
        return Ok((Geocoder::open(path)?, None));
    }
    let file = create_test_dataset(&TestDataConfig::sample())?;
    Ok((Geocoder::open(file.path())?, Some(file)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (geocoder, _sample) = open_geocoder()?;

    // Simple lookup, Italian places first
    println!("Searching for 'Milano':");
    print_response(&geocoder.geocode("Milano", &SearchOptions::default()), 3);

    // English exonym of an Italian city
    println!("\nSearching for 'Florence':");
    print_response(&geocoder.geocode("Florence", &SearchOptions::default()), 3);

    // Same name, restricted to one country
    println!("\nSearching for 'Milan' in the US:");
    let options = SearchOptions::builder().country("US").limit(5).build();
    print_response(&geocoder.geocode("Milan", &options), 5);

    // Nothing found: the response carries suggestions instead
    println!("\nSearching for 'Atlantis':");
    print_response(&geocoder.geocode("Atlantis", &SearchOptions::default()), 3);

    Ok(())
}

fn print_response(response: &GeocodeResponse, limit: usize) {
    if !response.success {
        let reason = response
            .error
            .as_ref()
            .map_or("unknown error", |e| e.message.as_str());
        println!("  No match: {reason}");
        if !response.suggestions.is_empty() {
            println!("  Did you mean: {}", response.suggestions.join(", "));
        }
        return;
    }

    for (i, result) in response.results.iter().take(limit).enumerate() {
        println!(
            "  {}. {} ({:.4}, {:.4}) - Population: {}, Confidence: {:.2}",
            i + 1,
            result.formatted,
            result.latitude,
            result.longitude,
            result.population,
            result.confidence
        );
    }

    if response.count > limit {
        println!("  ... and {} more results", response.count - limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = toponym::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_basic_search_example() {
        setup_test_env();
        assert!(
            main().is_ok(),
            "Basic search example should run successfully"
        );
    }
}
