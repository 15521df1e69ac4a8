use std::collections::BTreeMap;

use serde::Serialize;

use crate::scorer::ratio;

/// Built-in canonical sectors and their aliases.
const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("technology", &["tech", "it", "information technology", "software"]),
    ("healthcare", &["health", "medical", "pharma", "pharmaceutical"]),
    ("financial services", &["finance", "banking", "bank", "financial"]),
    ("real estate", &["property", "realty", "real estate development"]),
    ("energy", &["oil", "gas", "petroleum", "renewable energy"]),
    ("telecommunications", &["telecom", "communications", "mobile"]),
    ("manufacturing", &["industrial", "production", "factory"]),
    ("retail", &["consumer", "shopping", "commerce"]),
    ("transportation", &["logistics", "shipping", "transport"]),
];

/// Synonym table mapping sector labels onto canonical sector names.
#[derive(Debug, Clone)]
pub struct SectorTable {
    canonical: BTreeMap<String, Vec<String>>,
}

impl Default for SectorTable {
    fn default() -> Self {
        let canonical = DEFAULT_SYNONYMS
            .iter()
            .map(|(name, aliases)| {
                (name.to_string(), aliases.iter().map(|a| a.to_string()).collect())
            })
            .collect();
        Self { canonical }
    }
}

impl SectorTable {
    /// Default table extended with `extra` aliases (keyed by canonical name).
    pub fn with_extra(extra: &BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::default();
        for (name, aliases) in extra {
            let entry = table
                .canonical
                .entry(name.trim().to_lowercase())
                .or_default();
            for alias in aliases {
                let alias = alias.trim().to_lowercase();
                if !entry.contains(&alias) {
                    entry.push(alias);
                }
            }
        }
        table
    }

    /// Lowercased, trimmed sector mapped onto its canonical name when known.
    pub fn normalize(&self, sector: &str) -> String {
        let lowered = sector.trim().to_lowercase();
        match self.owner_of(&lowered) {
            Some(name) => name.to_string(),
            None => lowered,
        }
    }

    /// Canonical sector that `label` (already lowercased) names or aliases.
    pub fn owner_of(&self, label: &str) -> Option<&str> {
        self.canonical
            .iter()
            .find(|(name, aliases)| name.as_str() == label || aliases.iter().any(|a| a == label))
            .map(|(name, _)| name.as_str())
    }

    pub fn compare(&self, baseline_sector: &str, website_sector: &str, threshold: f64) -> SectorComparison {
        let normalized_baseline = self.normalize(baseline_sector);
        let normalized_website = self.normalize(website_sector);

        let (is_match, score) = if normalized_baseline.is_empty() || normalized_website.is_empty() {
            (false, 0.0)
        } else if normalized_baseline == normalized_website {
            (true, 100.0)
        } else {
            let score = ratio(&normalized_baseline, &normalized_website);
            (score >= threshold, score)
        };

        SectorComparison {
            is_match,
            score,
            normalized_baseline,
            normalized_website,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorComparison {
    pub is_match: bool,
    pub score: f64,
    pub normalized_baseline: String,
    pub normalized_website: String,
}
