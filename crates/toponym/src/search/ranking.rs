use std::cmp::Reverse;

use toponym_data::PlaceRecord;
use tracing::{debug, instrument};

use crate::{config::LocaleProfile, index::normalize};

/// Filters applied before ordering plus the ordering switches of one query.
#[derive(Debug, Clone, Copy)]
pub struct RankParams<'a> {
    pub limit: usize,
    pub country: Option<&'a str>,
    pub min_population: u64,
    pub prioritize_locale: bool,
}

/// Sort key of one candidate; smaller sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    locale_first: Reverse<bool>,
    exact: Reverse<bool>,
    prefix: Reverse<bool>,
    weight: Reverse<u64>,
}

/// How a record's names relate to a normalized query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NameRelation {
    pub exact: bool,
    pub prefix: bool,
}

pub(crate) fn name_relation(query_key: &str, record: &PlaceRecord) -> NameRelation {
    let mut relation = NameRelation::default();
    for name in record.names() {
        let name = name.to_lowercase();
        relation.exact |= name == query_key;
        relation.prefix |= name.starts_with(query_key);
        if relation.exact {
            // An exact match is also a prefix match, nothing left to learn.
            break;
        }
    }
    relation
}

fn rank_key(
    query_key: &str,
    record: &PlaceRecord,
    profile: &LocaleProfile,
    prioritize_locale: bool,
) -> RankKey {
    let relation = name_relation(query_key, record);
    let boost = profile.boost(&normalize(&record.name));
    RankKey {
        locale_first: Reverse(prioritize_locale && profile.is_priority_country(&record.country)),
        exact: Reverse(relation.exact),
        prefix: Reverse(relation.prefix),
        weight: Reverse(record.population.saturating_add(boost)),
    }
}

/// Filter, order and cap candidate positions.
///
/// The order is: priority country first (when enabled), then exact name matches, then
/// prefix matches, then descending population plus boost. Equal keys keep candidate order.
/// Truncation happens only after the full sort.
#[instrument(name = "Rank candidates", level = "debug", skip_all, fields(query = query_key, candidates = candidates.len()))]
pub fn rank(
    records: &[PlaceRecord],
    candidates: Vec<usize>,
    query_key: &str,
    params: &RankParams<'_>,
    profile: &LocaleProfile,
) -> Vec<usize> {
    let mut filtered = candidates;

    // A blank country is no filter, same as the options builder.
    if let Some(country) = params.country.filter(|c| !c.trim().is_empty()) {
        filtered.retain(|&p| records[p].is_in_country(country));
        debug!(country, remaining = filtered.len(), "Filtered by country");
    }
    if params.min_population > 0 {
        filtered.retain(|&p| records[p].population >= params.min_population);
        debug!(
            min_population = params.min_population,
            remaining = filtered.len(),
            "Filtered by population"
        );
    }

    filtered.sort_by_cached_key(|&p| {
        rank_key(query_key, &records[p], profile, params.prioritize_locale)
    });
    let total = filtered.len();
    filtered.truncate(params.limit);

    debug!(kept = filtered.len(), total, "Ranked candidates");
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, country: &str, population: u64, alts: &[&str]) -> PlaceRecord {
        PlaceRecord::new(
            name,
            country,
            10.0,
            10.0,
            population,
            alts.iter().map(ToString::to_string).collect(),
        )
        .unwrap()
    }

    fn params(limit: usize) -> RankParams<'static> {
        RankParams {
            limit,
            country: None,
            min_population: 0,
            prioritize_locale: true,
        }
    }

    fn names(records: &[PlaceRecord], ranked: &[usize]) -> Vec<String> {
        ranked.iter().map(|&p| records[p].formatted()).collect()
    }

    #[test]
    fn test_priority_country_outranks_exact_match() {
        let records = vec![
            place("Milan", "US", 7_851, &[]),
            place("Milano Marittima", "IT", 1_550, &[]),
        ];
        let profile = LocaleProfile::default();

        let ranked = rank(&records, vec![0, 1], "milan", &params(10), &profile);
        assert_eq!(names(&records, &ranked), ["Milano Marittima, IT", "Milan, US"]);

        let global = RankParams {
            prioritize_locale: false,
            ..params(10)
        };
        let ranked = rank(&records, vec![0, 1], "milan", &global, &profile);
        assert_eq!(names(&records, &ranked), ["Milan, US", "Milano Marittima, IT"]);
    }

    #[test]
    fn test_exact_then_prefix_then_population() {
        let records = vec![
            place("Cibari", "FR", 9_000_000, &[]),
            place("Barletta", "FR", 90_000, &[]),
            place("Barcelona", "FR", 1_600_000, &[]),
            place("Somewhere", "FR", 10, &["Bar"]),
        ];
        let ranked = rank(
            &records,
            vec![0, 1, 2, 3],
            "bar",
            &params(10),
            &LocaleProfile::default(),
        );
        assert_eq!(ranked, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_boost_applies_to_primary_name() {
        let records = vec![
            place("Big Town", "IT", 3_000_000, &["Torino"]),
            place("Torino", "IT", 870_456, &[]),
        ];
        // Both exact; Torino's 1,000,000 boost is not enough to pass 3,000,000.
        let profile = LocaleProfile::default();
        let ranked = rank(&records, vec![0, 1], "torino", &params(10), &profile);
        assert_eq!(ranked, vec![0, 1]);

        let boosted = profile.with_boost("torino", 5_000_000);
        let ranked = rank(&records, vec![0, 1], "torino", &params(10), &boosted);
        assert_eq!(ranked, vec![1, 0]);
    }

    #[test]
    fn test_filters_and_limit() {
        let records = vec![
            place("Rome", "US", 36_303, &[]),
            place("Roma", "IT", 2_318_895, &["Rome"]),
            place("Rome", "us", 32_573, &[]),
            place("Romano", "IT", 900, &[]),
        ];
        let profile = LocaleProfile::default();

        let us = RankParams {
            country: Some("US"),
            ..params(10)
        };
        assert_eq!(rank(&records, vec![0, 1, 2, 3], "rome", &us, &profile), vec![0, 2]);

        let big = RankParams {
            min_population: 33_000,
            ..params(10)
        };
        assert_eq!(rank(&records, vec![0, 1, 2, 3], "rome", &big, &profile), vec![1, 0]);

        let ranked = rank(&records, vec![0, 1, 2, 3], "rome", &params(1), &profile);
        assert_eq!(ranked, vec![1]);
    }

    #[test]
    fn test_blank_or_padded_country_filter() {
        let records = vec![place("Roma", "IT", 2_318_895, &[]), place("Rome", "US", 36_303, &[])];
        let profile = LocaleProfile::default();

        let padded = RankParams {
            country: Some(" it "),
            ..params(10)
        };
        assert_eq!(rank(&records, vec![0, 1], "rom", &padded, &profile), vec![0]);

        for blank in ["", "   "] {
            let unfiltered = RankParams {
                country: Some(blank),
                ..params(10)
            };
            assert_eq!(rank(&records, vec![0, 1], "rom", &unfiltered, &profile), vec![0, 1]);
        }
    }

    #[test]
    fn test_truncation_happens_after_sort() {
        let records = vec![
            place("Nowhere", "FR", 1, &[]),
            place("Paris", "FR", 2_138_551, &[]),
        ];
        let ranked = rank(&records, vec![0, 1], "paris", &params(1), &LocaleProfile::default());
        assert_eq!(ranked, vec![1]);
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let records = vec![place("Verona", "US", 100, &[]), place("Verona", "US", 100, &[])];
        let profile = LocaleProfile::default();
        assert_eq!(rank(&records, vec![1, 0], "verona", &params(5), &profile), vec![1, 0]);
        assert_eq!(rank(&records, vec![0, 1], "verona", &params(5), &profile), vec![0, 1]);
    }
}
