//! Engine configuration and locale profiles
//!
//! This example demonstrates how to:
//! - Compare search option presets
//! - Swap the bundled Italian locale profile for a custom one
//! - Inspect engine statistics

use toponym::{
    Geocoder, GeocoderConfig, LocaleProfile, SearchOptions, SearchOptionsBuilder,
    data::{TestDataConfig, test_dataset},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = test_dataset(&TestDataConfig::sample())?;

    // Default engine: Italy first, bundled boosts and aliases
    let italian = Geocoder::from_dataset(GeocoderConfig::default(), dataset.clone());
    compare_presets(&italian, "Rome");

    // A US-centred profile with its own boost and canned suggestions
    let profile = LocaleProfile::new("US")
        .with_country_hint("USA")
        .with_boost("new york city", 10_000_000)
        .with_aliases("big apple", ["new york city"])
        .with_suggestions("nyc", ["New York City", "New York"]);
    let config = GeocoderConfig::builder()
        .profile(profile)
        .fallback_min_population(100_000)
        .reverse_max_results(5)
        .build()?;
    let american = Geocoder::from_dataset(config, dataset);

    println!("\nWith a US locale profile:");
    compare_presets(&american, "Rome");

    let response = american.geocode("Gotham", &SearchOptions::default());
    println!("  'Gotham' suggestions: {:?}", response.suggestions);

    // Engine statistics
    let stats = italian.stats();
    println!("\nStatistics:");
    println!("  Records:          {}", stats.total_records);
    println!("  Countries:        {}", stats.countries);
    println!(
        "  {} records:      {}",
        stats.priority_locale, stats.priority_locale_records
    );
    println!("  Index entries:    {}", stats.index_entries);
    println!("  Memory:           {}", stats.memory_usage);

    Ok(())
}

fn compare_presets(geocoder: &Geocoder, query: &str) {
    let presets = [
        ("Default", SearchOptions::default()),
        ("Exact", SearchOptionsBuilder::exact().build()),
        ("Global", SearchOptionsBuilder::global().build()),
    ];

    println!(
        "Presets for '{query}' (priority locale {}):",
        geocoder.config().profile.priority_country()
    );
    for (label, options) in presets {
        let response = geocoder.geocode(query, &options);
        let labels: Vec<&str> = response
            .results
            .iter()
            .map(|r| r.formatted.as_str())
            .collect();
        println!("  {label:<8} {} results: {}", response.count, labels.join("; "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = toponym::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_configuration_example() {
        setup_test_env();
        assert!(
            main().is_ok(),
            "Configuration example should run successfully"
        );
    }
}
