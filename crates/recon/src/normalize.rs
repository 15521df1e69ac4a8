//! Company name canonicalization.
//!
//! `normalize` lowercases, replaces punctuation with spaces, collapses
//! whitespace and strips trailing business suffixes. `core_name` additionally
//! drops filler words.

/// Business suffixes stripped from the end of a name.
const BUSINESS_SUFFIXES: &[&str] = &[
    "holding company",
    "holding co",
    "holding corp",
    "holding corporation",
    "investment company",
    "investment co",
    "trading company",
    "trading co",
    "company limited",
    "company ltd",
    "co limited",
    "co ltd",
    "corporation",
    "corp",
    "incorporated",
    "inc",
    "limited",
    "ltd",
    "limited liability company",
    "llc",
    "holding",
    "company",
    "co",
    "group",
    "plc",
    "sa",
    "bsc",
    "ksc",
];

const FILLER_WORDS: &[&str] = &["the", "a", "an", "and", "or", "of", "for", "in", "on", "at"];

/// Canonical form of a company name. Empty input yields an empty string.
pub fn normalize(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let mut normalized = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    while let Some(stripped) = strip_longest_suffix(&normalized) {
        normalized = stripped;
    }

    normalized
}

/// Strip the longest vocabulary suffix that ends `name` after a space.
/// `None` if nothing matches or stripping would leave the name empty.
fn strip_longest_suffix(name: &str) -> Option<String> {
    let suffix = BUSINESS_SUFFIXES
        .iter()
        .filter(|suffix| {
            name.len() > suffix.len()
                && name.ends_with(*suffix)
                && name[..name.len() - suffix.len()].ends_with(' ')
        })
        .max_by_key(|suffix| suffix.chars().count())?;

    let remaining = name[..name.len() - suffix.len()].trim_end();
    if remaining.is_empty() {
        None
    } else {
        Some(remaining.to_string())
    }
}

/// Normalized name with filler words removed. Token order is preserved.
pub fn core_name(name: &str) -> String {
    normalize(name)
        .split(' ')
        .filter(|token| !token.is_empty() && !FILLER_WORDS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("  Saudi  Aramco, Inc. "), "saudi aramco");
        assert_eq!(normalize("Alpha-Beta (ABC)"), "alpha beta abc");
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("!!!"), "");
        assert_eq!(core_name(""), "");
    }

    #[test]
    fn strips_longest_suffix_first() {
        // "holding company" wins over "company"
        assert_eq!(normalize("Saudi Technology Holding Company"), "saudi technology");
        assert_eq!(normalize("Dan Company Ltd"), "dan");
    }

    #[test]
    fn strips_stacked_suffixes() {
        assert_eq!(normalize("Acme Group Holding Co Ltd"), "acme");
        assert_eq!(normalize("Acme Co Co Co Co Co"), "acme");
    }

    #[test]
    fn never_strips_to_empty() {
        assert_eq!(normalize("Company"), "company");
        assert_eq!(normalize("Group Ltd"), "group");
    }

    #[test]
    fn suffix_needs_word_boundary() {
        // "disco" ends with "co" but not " co"
        assert_eq!(normalize("Disco"), "disco");
        assert_eq!(normalize("Petco Inc"), "petco");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(normalize("Société Générale SA"), "société générale");
        assert_eq!(normalize("شركة الاتصالات"), "شركة الاتصالات");
    }

    #[test]
    fn core_name_drops_fillers_anywhere() {
        assert_eq!(core_name("The Bank of the East"), "bank east");
        assert_eq!(core_name("Red Sea Global"), "red sea global");
        assert_eq!(core_name("The Helicopter Company (THC)"), "helicopter company thc");
    }

    #[test]
    fn normalize_is_idempotent_on_samples() {
        for name in [
            "The Saudi Electricity Co.",
            "ACWA Power Company Limited",
            "Ma'aden Holding Group PLC",
            "a b c co ltd group inc",
        ] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {name:?}");
        }
    }
}
