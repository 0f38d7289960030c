//! In-memory name index over every name variant of every place.
//!
//! Keys are normalized names (primary and alternate), values are the positions of the
//! records carrying that name. Key order follows first appearance in the record sequence,
//! which keeps prefix and substring scans deterministic across loads.

use ahash::AHashMap as HashMap;
use toponym_data::PlaceRecord;
use tracing::{debug, info, instrument};

/// Names shorter than this (in characters, after normalization) are not indexed.
pub const MIN_KEY_CHARS: usize = 2;

/// Lower-case and trim a name or query. Applied identically at index and query time.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// `true` when a normalized string is long enough to be indexed or searched.
pub fn is_searchable(key: &str) -> bool {
    key.chars().count() >= MIN_KEY_CHARS
}

/// One index key with the positions of every record that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    /// Record positions in ascending order, without duplicates.
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Vec<IndexEntry>,
    slots: HashMap<String, usize>,
}

impl NameIndex {
    /// Build the index in a single pass over every name variant.
    #[instrument(name = "Build name index", level = "info", skip_all, fields(records = records.len()))]
    pub fn build(records: &[PlaceRecord]) -> Self {
        let t_build = std::time::Instant::now();
        let mut index = Self::default();
        let mut skipped = 0usize;

        for (position, record) in records.iter().enumerate() {
            for name in record.names() {
                let key = normalize(name);
                if is_searchable(&key) {
                    index.insert(key, position);
                } else {
                    skipped += 1;
                }
            }
        }

        debug!(skipped, "Names too short to index");
        info!(
            entries = index.len(),
            elapsed = ?t_build.elapsed(),
            "Name index built"
        );
        index
    }

    fn insert(&mut self, key: String, position: usize) {
        if let Some(&slot) = self.slots.get(&key) {
            let positions = &mut self.entries[slot].positions;
            // Positions arrive in ascending order, so a repeat can only be the last one.
            if positions.last() != Some(&position) {
                positions.push(position);
            }
        } else {
            self.slots.insert(key.clone(), self.entries.len());
            self.entries.push(IndexEntry {
                key,
                positions: vec![position],
            });
        }
    }

    /// Positions of the records whose normalized name equals `key` exactly.
    pub fn get(&self, key: &str) -> Option<&[usize]> {
        self.slots
            .get(key)
            .map(|&slot| self.entries[slot].positions.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// All entries in first-seen order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rough resident size: key bytes twice (entry and slot map) plus position storage.
    pub fn approx_memory_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|e| {
                2 * (e.key.len() + std::mem::size_of::<String>())
                    + std::mem::size_of::<IndexEntry>()
                    + e.positions.len() * std::mem::size_of::<usize>()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, alts: &[&str]) -> PlaceRecord {
        PlaceRecord::new(
            name,
            "IT",
            45.0,
            9.0,
            1_000,
            alts.iter().map(ToString::to_string).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Milano "), "milano");
        assert_eq!(normalize("MÜNCHEN"), "münchen");
        assert!(is_searchable("ab"));
        assert!(!is_searchable("a"));
        // Counted in characters, not bytes.
        assert!(!is_searchable("é"));
    }

    #[test]
    fn test_indexes_primary_and_alternate_names() {
        let records = vec![
            record("Milano", &["Milan", "Mailand"]),
            record("Milan", &[]),
        ];
        let index = NameIndex::build(&records);

        assert_eq!(index.get("milano"), Some(&[0][..]));
        assert_eq!(index.get("milan"), Some(&[0, 1][..]));
        assert_eq!(index.get("mailand"), Some(&[0][..]));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_skips_short_names() {
        let records = vec![record("Rho", &["R", " X "])];
        let index = NameIndex::build(&records);

        assert_eq!(index.len(), 1);
        assert!(index.contains_key("rho"));
        assert!(!index.contains_key("r"));
        assert!(!index.contains_key("x"));
    }

    #[test]
    fn test_alternate_equal_to_primary_is_not_duplicated() {
        let records = vec![record("Roma", &["ROMA", "Rome", "rome"])];
        let index = NameIndex::build(&records);

        assert_eq!(index.get("roma"), Some(&[0][..]));
        assert_eq!(index.get("rome"), Some(&[0][..]));
    }

    #[test]
    fn test_entries_keep_first_seen_order() {
        let records = vec![record("Torino", &["Turin"]), record("Bari", &["Torino"])];
        let index = NameIndex::build(&records);

        let keys: Vec<&str> = index.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["torino", "turin", "bari"]);
        assert_eq!(index.get("torino"), Some(&[0, 1][..]));
        assert!(index.approx_memory_bytes() > 0);
    }

    #[test]
    fn test_rebuild_is_identical() {
        let records = vec![record("Roma", &["Rome"]), record("Rome", &[])];
        let a = NameIndex::build(&records);
        let b = NameIndex::build(&records);
        assert_eq!(a.entries(), b.entries());
    }
}
