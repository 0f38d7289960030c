//! Three-tier text matching over the name index: exact, then prefix, then substring.

use ahash::AHashSet as HashSet;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::index::{IndexEntry, NameIndex, is_searchable};

/// Which tier first produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum MatchTier {
    Exact,
    Prefix,
    Contains,
}

/// Candidate record positions in tier order, each position at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub positions: Vec<usize>,
    pub exact: usize,
    pub prefix: usize,
    pub contains: usize,
    /// `false` when the substring scan was not run.
    pub contains_scanned: bool,
}

impl Candidates {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Tier of the candidate at `rank` in [`Candidates::positions`].
    pub fn tier_of(&self, rank: usize) -> Option<MatchTier> {
        if rank < self.exact {
            Some(MatchTier::Exact)
        } else if rank < self.exact + self.prefix {
            Some(MatchTier::Prefix)
        } else if rank < self.len() {
            Some(MatchTier::Contains)
        } else {
            None
        }
    }
}

struct TierCollector {
    seen: HashSet<usize>,
    positions: Vec<usize>,
}

impl TierCollector {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            positions: Vec::new(),
        }
    }

    /// Append unseen positions, returning how many were new.
    fn extend(&mut self, positions: impl IntoIterator<Item = usize>) -> usize {
        let before = self.positions.len();
        for position in positions {
            if self.seen.insert(position) {
                self.positions.push(position);
            }
        }
        self.positions.len() - before
    }
}

/// Positions of every entry whose key satisfies `predicate`, in index order.
fn scan(entries: &[IndexEntry], predicate: impl Fn(&str) -> bool + Sync) -> Vec<usize> {
    entries
        .par_iter()
        .filter(|entry| predicate(&entry.key))
        .flat_map_iter(|entry| entry.positions.iter().copied())
        .collect()
}

/// Collect candidates for an already normalized query.
///
/// Queries shorter than two characters match nothing. The prefix and substring tiers are
/// skipped for exact-only searches; the substring tier is also skipped once the first two
/// tiers hold at least twice `limit` candidates.
#[instrument(name = "Match candidates", level = "debug", skip(index))]
pub fn match_candidates(
    index: &NameIndex,
    query_key: &str,
    exact_only: bool,
    limit: usize,
) -> Candidates {
    let mut candidates = Candidates::default();
    if !is_searchable(query_key) {
        return candidates;
    }

    let mut collector = TierCollector::new();
    candidates.exact = collector.extend(index.get(query_key).unwrap_or_default().iter().copied());

    if !exact_only {
        let prefix_hits = scan(index.entries(), |key| {
            key.starts_with(query_key) && key != query_key
        });
        candidates.prefix = collector.extend(prefix_hits);

        if candidates.exact + candidates.prefix < limit.saturating_mul(2) {
            let contains_hits = scan(index.entries(), |key| {
                !key.starts_with(query_key) && key.contains(query_key)
            });
            candidates.contains = collector.extend(contains_hits);
            candidates.contains_scanned = true;
        }
    }

    debug!(
        exact = candidates.exact,
        prefix = candidates.prefix,
        contains = candidates.contains,
        contains_scanned = candidates.contains_scanned,
        "Tier matches"
    );
    candidates.positions = collector.positions;
    candidates
}
