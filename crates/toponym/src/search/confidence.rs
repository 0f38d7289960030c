use toponym_data::PlaceRecord;

use crate::config::LocaleProfile;

pub const EXACT_PRIMARY: f64 = 0.95;
pub const EXACT_ALTERNATE: f64 = 0.90;
pub const ALIAS_PRIMARY: f64 = 0.88;
pub const ALIAS_ALTERNATE: f64 = 0.85;
pub const PREFIX_PRIMARY: f64 = 0.75;
pub const PREFIX_ALTERNATE: f64 = 0.70;
pub const CONTAINS_PRIMARY: f64 = 0.60;
pub const CONTAINS_ALTERNATE: f64 = 0.55;
pub const UNRELATED: f64 = 0.45;

pub const LOCALE_BONUS: f64 = 0.10;
pub const MAX_POPULATION_BONUS: f64 = 0.15;
/// Population at which the population bonus would reach 1.0 before capping.
pub const POPULATION_SCALE: f64 = 2_000_000.0;

/// Relevance of `record` to a normalized query, in `[0, 1]`.
///
/// The first matching rule wins: exact primary, exact alternate, alias of the primary,
/// alias of an alternate, primary prefix, alternate prefix, primary substring, alternate
/// substring. Without any textual relation the score is a base plus a population bonus.
/// Places of the priority country always get [`LOCALE_BONUS`] on top.
pub fn confidence(query_key: &str, record: &PlaceRecord, profile: &LocaleProfile) -> f64 {
    let locale_bonus = if profile.is_priority_country(&record.country) {
        LOCALE_BONUS
    } else {
        0.0
    };
    (base_score(query_key, record, profile) + locale_bonus).min(1.0)
}

fn base_score(query_key: &str, record: &PlaceRecord, profile: &LocaleProfile) -> f64 {
    let primary = record.name.to_lowercase();
    let alternates: Vec<String> = record
        .alternate_names
        .iter()
        .map(|alt| alt.to_lowercase())
        .collect();

    if primary == query_key {
        return EXACT_PRIMARY;
    }
    if alternates.iter().any(|alt| alt == query_key) {
        return EXACT_ALTERNATE;
    }

    let aliases = profile.aliases(query_key);
    if !aliases.is_empty() {
        if aliases.contains(&primary) {
            return ALIAS_PRIMARY;
        }
        if alternates.iter().any(|alt| aliases.contains(alt)) {
            return ALIAS_ALTERNATE;
        }
    }

    if primary.starts_with(query_key) {
        return PREFIX_PRIMARY;
    }
    if alternates.iter().any(|alt| alt.starts_with(query_key)) {
        return PREFIX_ALTERNATE;
    }
    if primary.contains(query_key) {
        return CONTAINS_PRIMARY;
    }
    if alternates.iter().any(|alt| alt.contains(query_key)) {
        return CONTAINS_ALTERNATE;
    }

    UNRELATED + (record.population as f64 / POPULATION_SCALE).min(MAX_POPULATION_BONUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn place(name: &str, country: &str, population: u64, alts: &[&str]) -> PlaceRecord {
        PlaceRecord::new(
            name,
            country,
            0.0,
            0.0,
            population,
            alts.iter().map(ToString::to_string).collect(),
        )
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[rstest]
    #[case::exact_primary("paris", &[], EXACT_PRIMARY)]
    #[case::exact_alternate("parigi", &["Parigi"], EXACT_ALTERNATE)]
    #[case::prefix_primary("par", &[], PREFIX_PRIMARY)]
    #[case::primary_prefix_wins("pari", &["Parijs"], PREFIX_PRIMARY)]
    #[case::prefix_alternate_only("lut", &["Lutetia"], PREFIX_ALTERNATE)]
    #[case::contains_primary("ari", &[], CONTAINS_PRIMARY)]
    #[case::contains_alternate("tetia", &["Lutetia"], CONTAINS_ALTERNATE)]
    fn test_text_rules(#[case] query: &str, #[case] alts: &[&str], #[case] expected: f64) {
        let record = place("Paris", "FR", 0, alts);
        assert_close(confidence(query, &record, &LocaleProfile::default()), expected);
    }

    #[test]
    fn test_alias_rules() {
        let profile = LocaleProfile::new("XX").with_aliases("lutece", ["paris", "lutetia"]);

        let primary = place("Paris", "FR", 0, &[]);
        assert_close(confidence("lutece", &primary, &profile), ALIAS_PRIMARY);

        let alternate = place("Ville", "FR", 0, &["Lutetia"]);
        assert_close(confidence("lutece", &alternate, &profile), ALIAS_ALTERNATE);
    }

    #[test]
    fn test_bundled_alias_table() {
        let profile = LocaleProfile::default();
        // "turin" is neither a name nor a substring of "Torino", only an alias.
        let torino = place("Torino", "FR", 0, &[]);
        assert_close(confidence("turin", &torino, &profile), ALIAS_PRIMARY);
    }

    #[test]
    fn test_population_bonus_is_capped() {
        let profile = LocaleProfile::new("XX");
        let small = place("Alpha", "FR", 200_000, &[]);
        assert_close(confidence("zz", &small, &profile), UNRELATED + 0.1);

        let huge = place("Alpha", "FR", 20_000_000, &[]);
        assert_close(confidence("zz", &huge, &profile), UNRELATED + MAX_POPULATION_BONUS);
    }

    #[test]
    fn test_locale_bonus_and_clamp() {
        let profile = LocaleProfile::default();
        let milano = place("Milano", "IT", 1_236_837, &["Milan"]);
        assert_close(confidence("milano", &milano, &profile), 1.0);
        assert_close(confidence("milan", &milano, &profile), 1.0);
        assert_close(confidence("mil", &milano, &profile), PREFIX_PRIMARY + LOCALE_BONUS);

        let milan_us = place("Milan", "US", 7_851, &[]);
        assert_close(confidence("milan", &milan_us, &profile), EXACT_PRIMARY);
        assert_close(confidence("milano", &milan_us, &profile), ALIAS_PRIMARY);
    }

    #[test]
    fn test_always_within_bounds() {
        let profile = LocaleProfile::default();
        for population in [0, 1, 1_999_999, u64::MAX] {
            let record = place("Roma", "IT", population, &["Rome"]);
            for query in ["roma", "rome", "ro", "om", "zz"] {
                let score = confidence(query, &record, &profile);
                assert!((0.0..=1.0).contains(&score), "{query} -> {score}");
            }
        }
    }
}
