use crate::{config::LocaleProfile, index::normalize};

/// Alternative query strings for a search that found nothing.
///
/// Canned entries from the profile win; otherwise the query is qualified with the priority
/// country code and with the country hint.
pub fn suggest(query: &str, profile: &LocaleProfile) -> Vec<String> {
    if let Some(canned) = profile
        .suggestions(&normalize(query))
        .filter(|canned| !canned.is_empty())
    {
        return canned.to_vec();
    }

    let query = query.trim();
    vec![
        format!("{query} {}", profile.priority_country()),
        format!("{query} {}", profile.country_hint()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_suggestions() {
        let profile = LocaleProfile::default();
        assert_eq!(suggest("  MILAN ", &profile), ["Milano", "Milano IT", "Milano Italia"]);
        assert_eq!(suggest("Genova", &profile), ["Genoa", "Genova Italia"]);
    }

    #[test]
    fn test_generic_suggestions() {
        let profile = LocaleProfile::default();
        assert_eq!(
            suggest("xyqqnonexistent123", &profile),
            ["xyqqnonexistent123 IT", "xyqqnonexistent123 Italia"]
        );
    }

    #[test]
    fn test_generic_suggestions_follow_profile() {
        let profile = LocaleProfile::new("de").with_country_hint("Deutschland");
        assert_eq!(suggest("Köln", &profile), ["Köln DE", "Köln Deutschland"]);
    }
}
