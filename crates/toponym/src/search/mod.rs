//! Forward and reverse search over a loaded dataset.
//!
//! Forward queries flow matching -> ranking -> confidence, wrapped by the fallback
//! pipeline. Reverse queries go straight to the distance filter.

mod confidence;
mod matching;
mod pipeline;
mod ranking;
mod reverse;
mod suggest;

pub use confidence::confidence;
pub use matching::{Candidates, MatchTier, match_candidates};
pub use pipeline::{SearchStage, StagedMatches, search_stage, search_with_fallback};
pub use ranking::{RankParams, rank};
pub use reverse::{EARTH_RADIUS_KM, Nearby, haversine_km, nearby};
pub use suggest::suggest;
