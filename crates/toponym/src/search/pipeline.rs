//! Forward search with graceful degradation.
//!
//! A query runs through up to three stages, stopping at the first that finds anything:
//! the caller's options, the same options without a population floor, then a worldwide
//! search without locale priority restricted to sizeable places. Limit, country filter and
//! exact-only flag are carried through every stage.

use toponym_data::Dataset;
use tracing::{debug, info, instrument, warn};

use super::{
    matching::match_candidates,
    ranking::{RankParams, rank},
};
use crate::{
    config::{LocaleProfile, SearchOptions},
    index::NameIndex,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum SearchStage {
    /// The caller's options, unchanged
    Primary,
    /// Population floor removed
    WithoutPopulationFloor,
    /// Locale priority off, fallback population floor
    Global,
}

impl SearchStage {
    pub const ALL: [Self; 3] = [Self::Primary, Self::WithoutPopulationFloor, Self::Global];

    /// Options this stage searches with.
    pub fn options(self, base: &SearchOptions, fallback_min_population: u64) -> SearchOptions {
        match self {
            Self::Primary => base.clone(),
            Self::WithoutPopulationFloor => SearchOptions {
                min_population: 0,
                ..base.clone()
            },
            Self::Global => SearchOptions {
                prioritize_locale: false,
                min_population: fallback_min_population,
                ..base.clone()
            },
        }
    }
}

/// Match and rank one normalized query under one set of options.
pub fn search_stage(
    dataset: &Dataset,
    index: &NameIndex,
    query_key: &str,
    options: &SearchOptions,
    profile: &LocaleProfile,
) -> Vec<usize> {
    let candidates = match_candidates(index, query_key, options.exact_only, options.limit);
    let params = RankParams {
        limit: options.limit,
        country: options.country.as_deref(),
        min_population: options.min_population,
        prioritize_locale: options.prioritize_locale,
    };
    rank(
        dataset.records(),
        candidates.positions,
        query_key,
        &params,
        profile,
    )
}

/// Ranked positions accumulated over the stage ladder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedMatches {
    pub positions: Vec<usize>,
    /// Stage that produced [`StagedMatches::positions`], `None` when every stage was empty
    pub stage: Option<SearchStage>,
}

/// Run the stage ladder for a normalized query.
///
/// A stage whose options equal the previous stage's is skipped, it cannot find anything new.
#[instrument(name = "Forward search", level = "info", skip(dataset, index, options, profile))]
pub fn search_with_fallback(
    dataset: &Dataset,
    index: &NameIndex,
    query_key: &str,
    options: &SearchOptions,
    profile: &LocaleProfile,
    fallback_min_population: u64,
) -> StagedMatches {
    let t_search = std::time::Instant::now();
    let mut staged = StagedMatches::default();
    let mut previous: Option<SearchOptions> = None;

    for stage in SearchStage::ALL {
        let stage_options = stage.options(options, fallback_min_population);
        if previous.as_ref() == Some(&stage_options) {
            debug!(?stage, "Stage identical to previous one, skipping");
            continue;
        }
        if stage != SearchStage::Primary {
            warn!(?stage, "No results so far, trying fallback stage");
        }

        let found = search_stage(dataset, index, query_key, &stage_options, profile);
        debug!(?stage, found = found.len(), "Stage finished");
        staged.positions.extend(found);
        if !staged.positions.is_empty() {
            staged.stage = Some(stage);
            break;
        }
        previous = Some(stage_options);
    }

    info!(
        results = staged.positions.len(),
        stage = ?staged.stage,
        elapsed = ?t_search.elapsed(),
        "Forward search finished"
    );
    staged
}
