use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ReconError;
use crate::sector::SectorTable;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Reconciliation settings. Every section is optional; an empty file yields
/// the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Extra sector aliases, keyed by canonical sector. Merged into the
    /// built-in synonym table.
    #[serde(default)]
    pub sectors: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub recommendations: RecommendationThresholds,
    #[serde(default)]
    pub history: HistoryConfig,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum name score for a baseline record to count as present.
    pub fuzzy_match: f64,
    /// Minimum sector similarity for two sectors to agree.
    pub sector_match: f64,
    /// Name score at or above which only the sector can still differ.
    pub exact_match: f64,
    /// Reserved. Carried in config and reports, not consulted by matching.
    pub partial_match: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fuzzy_match: 90.0,
            sector_match: 80.0,
            exact_match: 95.0,
            partial_match: 90.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Recommendations + History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    /// Missing-from-website count above which adding is flagged high priority.
    pub missing_high_priority: usize,
    /// Extra-on-website count above which a review is requested.
    pub extra_review: usize,
    /// Accuracy rate (percent) below which data quality is flagged.
    pub accuracy_target: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            missing_high_priority: 10,
            extra_review: 5,
            accuracy_target: 95.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryConfig {
    /// SQLite database path. Relative paths resolve against the config file.
    #[serde(default)]
    pub path: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let t = &self.thresholds;
        for (name, value) in [
            ("fuzzy_match", t.fuzzy_match),
            ("sector_match", t.sector_match),
            ("exact_match", t.exact_match),
            ("partial_match", t.partial_match),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ReconError::ConfigValidation(format!(
                    "thresholds.{name} must be between 0 and 100, got {value}"
                )));
            }
        }

        if t.exact_match < t.fuzzy_match {
            return Err(ReconError::ConfigValidation(format!(
                "thresholds.exact_match ({}) must not be below thresholds.fuzzy_match ({})",
                t.exact_match, t.fuzzy_match
            )));
        }

        let target = self.recommendations.accuracy_target;
        if !(0.0..=100.0).contains(&target) {
            return Err(ReconError::ConfigValidation(format!(
                "recommendations.accuracy_target must be between 0 and 100, got {target}"
            )));
        }

        // Each label may resolve to one canonical sector only.
        let defaults = SectorTable::default();
        let mut owners: BTreeMap<String, String> = BTreeMap::new();
        for (canonical, aliases) in &self.sectors {
            if canonical.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "sector names must not be empty".into(),
                ));
            }
            if aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "sector '{canonical}': aliases must not be empty"
                )));
            }

            let name = canonical.trim().to_lowercase();
            for label in std::iter::once(canonical).chain(aliases) {
                let label = label.trim().to_lowercase();
                let owner = owners
                    .get(&label)
                    .cloned()
                    .or_else(|| defaults.owner_of(&label).map(str::to_string));
                if let Some(owner) = owner.filter(|owner| *owner != name) {
                    return Err(ReconError::ConfigValidation(format!(
                        "sector '{canonical}': '{label}' already belongs to sector '{owner}'"
                    )));
                }
                owners.insert(label, name.clone());
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
