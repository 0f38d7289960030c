use std::{collections::HashMap as StdHashMap, path::Path};

use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    error::{Result, ToponymError},
    index::normalize,
};

const DEFAULT_PROFILE_JSON: &str = include_str!("../../data/default_profile.json");

static DEFAULT_PROFILE: Lazy<LocaleProfile> = Lazy::new(|| {
    LocaleProfile::from_json(DEFAULT_PROFILE_JSON).expect("bundled locale profile is valid JSON")
});

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    priority_country: String,
    #[serde(default)]
    country_hint: Option<String>,
    #[serde(default)]
    boost_table: StdHashMap<String, u64>,
    #[serde(default)]
    alias_table: StdHashMap<String, Vec<String>>,
    #[serde(default)]
    suggestion_table: StdHashMap<String, Vec<String>>,
}

/// Locale heuristics applied on top of plain text matching.
///
/// A profile names one priority country whose places sort ahead of everything else,
/// a boost table compensating stale population figures of well-known places, a bilingual
/// alias table used by the confidence score, and the canned suggestions returned when a
/// search finds nothing.
///
/// Table keys are stored normalized (lower-cased, trimmed) regardless of how they were given.
#[derive(Debug, Clone)]
pub struct LocaleProfile {
    priority_country: String,
    country_hint: String,
    boost_table: HashMap<String, u64>,
    alias_table: HashMap<String, Vec<String>>,
    suggestion_table: HashMap<String, Vec<String>>,
}

impl Default for LocaleProfile {
    fn default() -> Self {
        DEFAULT_PROFILE.clone()
    }
}

impl LocaleProfile {
    /// An empty profile for `priority_country`: no boosts, aliases or canned suggestions.
    pub fn new(priority_country: impl Into<String>) -> Self {
        let priority_country = priority_country.into().trim().to_uppercase();
        Self {
            country_hint: priority_country.clone(),
            priority_country,
            boost_table: HashMap::new(),
            alias_table: HashMap::new(),
            suggestion_table: HashMap::new(),
        }
    }

    /// Parse a profile document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ProfileFile = serde_json::from_str(json)
            .map_err(|e| ToponymError::ConfigError(format!("Invalid locale profile: {e}")))?;
        Self::from_file(file)
    }

    /// Read a profile document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let profile = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            priority_country = %profile.priority_country,
            boosts = profile.boost_table.len(),
            aliases = profile.alias_table.len(),
            "Locale profile loaded"
        );
        Ok(profile)
    }

    fn from_file(file: ProfileFile) -> Result<Self> {
        if file.priority_country.trim().is_empty() {
            return Err(ToponymError::ConfigError(
                "Locale profile priority_country must not be empty".to_string(),
            ));
        }
        let mut profile = Self::new(file.priority_country);
        if let Some(hint) = file.country_hint.filter(|h| !h.trim().is_empty()) {
            profile.country_hint = hint.trim().to_string();
        }
        for (name, boost) in file.boost_table {
            profile = profile.with_boost(&name, boost);
        }
        for (query, aliases) in file.alias_table {
            profile = profile.with_aliases(&query, aliases);
        }
        for (query, suggestions) in file.suggestion_table {
            profile = profile.with_suggestions(&query, suggestions);
        }
        debug!(
            priority_country = %profile.priority_country,
            "Locale profile parsed"
        );
        Ok(profile)
    }

    pub fn with_country_hint(mut self, hint: impl Into<String>) -> Self {
        self.country_hint = hint.into();
        self
    }

    /// Add a ranking boost for places whose primary name normalizes to `name`.
    pub fn with_boost(mut self, name: &str, boost: u64) -> Self {
        self.boost_table.insert(normalize(name), boost);
        self
    }

    /// Declare `aliases` as equivalent names of `query` for confidence scoring.
    pub fn with_aliases<I, S>(mut self, query: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.alias_table.entry(normalize(query)).or_default();
        for alias in aliases {
            let alias = normalize(alias.as_ref());
            if !alias.is_empty() && !entry.contains(&alias) {
                entry.push(alias);
            }
        }
        self
    }

    /// Canned suggestions for a query, kept in the given order and spelling.
    pub fn with_suggestions<I, S>(mut self, query: &str, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestion_table.insert(
            normalize(query),
            suggestions.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn priority_country(&self) -> &str {
        &self.priority_country
    }

    pub fn country_hint(&self) -> &str {
        &self.country_hint
    }

    pub fn is_priority_country(&self, country: &str) -> bool {
        self.priority_country.eq_ignore_ascii_case(country)
    }

    /// Boost for a normalized primary name, 0 when absent.
    pub fn boost(&self, name_key: &str) -> u64 {
        self.boost_table.get(name_key).copied().unwrap_or_default()
    }

    /// Equivalent names of a normalized query.
    pub fn aliases(&self, query_key: &str) -> &[String] {
        self.alias_table
            .get(query_key)
            .map_or(&[], Vec::as_slice)
    }

    /// Canned suggestions of a normalized query.
    pub fn suggestions(&self, query_key: &str) -> Option<&[String]> {
        self.suggestion_table.get(query_key).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_profile_parses() {
        let profile = LocaleProfile::from_json(DEFAULT_PROFILE_JSON).unwrap();

        assert_eq!(profile.priority_country(), "IT");
        assert_eq!(profile.country_hint(), "Italia");
        assert_eq!(profile.boost("milan"), 4_000_000);
        assert_eq!(profile.boost("roma"), 3_500_000);
        assert_eq!(profile.boost("brescia"), 250_000);
        assert_eq!(profile.boost("paris"), 0);
        assert_eq!(profile.aliases("firenze"), ["florence".to_string()]);
        assert_eq!(
            profile.suggestions("milan").unwrap(),
            ["Milano", "Milano IT", "Milano Italia"]
        );
    }

    #[test]
    fn test_default_matches_bundled() {
        let profile = LocaleProfile::default();
        assert!(profile.is_priority_country("it"));
        assert_eq!(profile.aliases("genoa"), ["genova".to_string()]);
    }

    #[test]
    fn test_keys_are_normalized() {
        let profile = LocaleProfile::new(" fr ")
            .with_boost("  PARIS ", 9)
            .with_aliases("Parigi", ["PARIS", " paris "])
            .with_suggestions("Lutece", ["Paris"]);

        assert_eq!(profile.priority_country(), "FR");
        assert_eq!(profile.boost("paris"), 9);
        assert_eq!(profile.aliases("parigi"), ["paris".to_string()]);
        assert_eq!(profile.suggestions("lutece").unwrap(), ["Paris"]);
        assert!(profile.suggestions("paris").is_none());
    }

    #[test]
    fn test_invalid_profiles_are_config_errors() {
        assert!(matches!(
            LocaleProfile::from_json("{not json"),
            Err(ToponymError::ConfigError(_))
        ));
        assert!(matches!(
            LocaleProfile::from_json(r#"{"priority_country": "  "}"#),
            Err(ToponymError::ConfigError(_))
        ));
        assert!(matches!(
            LocaleProfile::from_json(r#"{"priority_country": "IT", "boosts": {}}"#),
            Err(ToponymError::ConfigError(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"priority_country": "de", "country_hint": "Deutschland",
                 "boost_table": {"Berlin": 1000}}"#,
        )
        .unwrap();

        let profile = LocaleProfile::from_path(file.path()).unwrap();
        assert_eq!(profile.priority_country(), "DE");
        assert_eq!(profile.country_hint(), "Deutschland");
        assert_eq!(profile.boost("berlin"), 1000);

        assert!(matches!(
            LocaleProfile::from_path("/no/such/profile.json"),
            Err(ToponymError::Io(_))
        ));
    }
}
