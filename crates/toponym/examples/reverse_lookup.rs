//! Reverse geocoding
//!
//! This example looks up named places around a few coordinates, with and without
//! locale priority, and shows the failure response for an empty area.

use tempfile::NamedTempFile;
use toponym::{
    DATASET_PATH_ENV, Geocoder, ReverseOptions, ReverseResponse,
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

    println!("Places within 20 km of Piazza del Duomo, Milano:");
    let response = geocoder.reverse_geocode(45.4642, 9.1900, &ReverseOptions::with_radius(20.0));
    print_response(&response);

    println!("\nPlaces around Lugano, locale priority on:");
    let options = ReverseOptions::with_radius(60.0);
    print_response(&geocoder.reverse_geocode(46.01, 8.96, &options));

    println!("\nPlaces around Lugano, locale priority off:");
    print_response(&geocoder.reverse_geocode(46.01, 8.96, &options.prioritize_locale(false)));

    println!("\nMiddle of the Pacific, default radius:");
    print_response(&geocoder.reverse_geocode(0.0, -150.0, &ReverseOptions::default()));

    Ok(())
}

fn print_response(response: &ReverseResponse) {
    if let Some(error) = &response.error {
        println!("  {}", error.message);
        return;
    }
    for (i, result) in response.results.iter().enumerate() {
        println!(
            "  {}. {} - {:.1} km, Population: {}",
            i + 1,
            result.formatted,
            result.distance_km,
            result.population
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = toponym::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_reverse_lookup_example() {
        setup_test_env();
        assert!(
            main().is_ok(),
            "Reverse lookup example should run successfully"
        );
    }
}
