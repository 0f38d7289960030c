use std::cmp::Ordering;

use rayon::prelude::*;
use toponym_data::PlaceRecord;
use tracing::{debug, instrument};

use crate::config::LocaleProfile;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Weight of `ln(population + 1)` subtracted from the distance when ordering.
pub const POPULATION_DISCOUNT: f64 = 0.1;

/// Great-circle distance in kilometres (haversine).
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_RADIUS_KM * c
}

/// A record position within the search radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearby {
    pub position: usize,
    pub distance_km: f64,
    locale_first: bool,
    score: f64,
}

impl Nearby {
    fn cmp_rank(&self, other: &Self) -> Ordering {
        other
            .locale_first
            .cmp(&self.locale_first)
            .then_with(|| self.score.total_cmp(&other.score))
    }
}

/// Places within `radius_km` of the point, best first, at most `max_results`.
///
/// Priority-country places come first when enabled, then ascending
/// `distance - ln(population + 1) * 0.1`. Equal scores keep dataset order.
#[instrument(name = "Reverse lookup", level = "debug", skip(records, profile))]
pub fn nearby(
    records: &[PlaceRecord],
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    prioritize_locale: bool,
    max_results: usize,
    profile: &LocaleProfile,
) -> Vec<Nearby> {
    let mut hits: Vec<Nearby> = records
        .par_iter()
        .enumerate()
        .filter_map(|(position, record)| {
            let distance_km = haversine_km(latitude, longitude, record.latitude, record.longitude);
            (distance_km <= radius_km).then(|| Nearby {
                position,
                distance_km,
                locale_first: prioritize_locale && profile.is_priority_country(&record.country),
                score: distance_km - ((record.population as f64) + 1.0).ln() * POPULATION_DISCOUNT,
            })
        })
        .collect();

    let within = hits.len();
    hits.sort_by(Nearby::cmp_rank);
    hits.truncate(max_results);

    debug!(within, kept = hits.len(), "Places within radius");
    hits
}
