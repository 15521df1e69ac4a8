use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// An authoritative company entry. Identity is its position in the baseline set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub cr_name: String,
    pub brand_name: String,
    pub sector: String,
}

impl BaselineRecord {
    pub fn new(cr_name: &str, brand_name: &str, sector: &str) -> Self {
        Self {
            cr_name: cr_name.into(),
            brand_name: brand_name.into(),
            sector: sector.into(),
        }
    }
}

/// A company entry observed on the external source for the current period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedRecord {
    pub name: String,
    pub sector: String,
}

impl ObservedRecord {
    pub fn new(name: &str, sector: &str) -> Self {
        Self {
            name: name.into(),
            sector: sector.into(),
        }
    }
}

/// Both record sets of one reconciliation, as loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconInput {
    pub baseline: Vec<BaselineRecord>,
    pub observed: Vec<ObservedRecord>,
}

// ---------------------------------------------------------------------------
// Match outcome
// ---------------------------------------------------------------------------

/// Which heuristic of the scoring waterfall produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    ExactNormalized,
    CoreExact,
    AcronymMatch,
    Substring,
    TokenBased,
    Fuzzy,
    TooShort,
    LengthMismatch,
    None,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactNormalized => write!(f, "exact_normalized"),
            Self::CoreExact => write!(f, "core_exact"),
            Self::AcronymMatch => write!(f, "acronym_match"),
            Self::Substring => write!(f, "substring"),
            Self::TokenBased => write!(f, "token_based"),
            Self::Fuzzy => write!(f, "fuzzy"),
            Self::TooShort => write!(f, "too_short"),
            Self::LengthMismatch => write!(f, "length_mismatch"),
            Self::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    None,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Which baseline name field produced the retained score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedField {
    CrName,
    BrandName,
    NotApplicable,
}

impl fmt::Display for MatchedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrName => write!(f, "CR Name"),
            Self::BrandName => write!(f, "Brand Name"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub score: f64,
    pub strategy: MatchStrategy,
    pub confidence: Confidence,
    pub matched_field: MatchedField,
}

impl MatchOutcome {
    pub fn new(score: f64, strategy: MatchStrategy, confidence: Confidence) -> Self {
        Self {
            score,
            strategy,
            confidence,
            matched_field: MatchedField::NotApplicable,
        }
    }

    /// Outcome of a pair that was never scored (no candidates, unmatched observed record).
    pub fn unmatched() -> Self {
        Self::new(0.0, MatchStrategy::None, Confidence::None)
    }

    pub fn with_field(mut self, field: MatchedField) -> Self {
        self.matched_field = field;
        self
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    RequiresNameUpdate,
    RequiresSectorUpdate,
    /// Present in the baseline, missing from the website.
    Add,
    /// Present on the website, missing from the baseline.
    Remove,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Ok,
        Status::Add,
        Status::Remove,
        Status::RequiresNameUpdate,
        Status::RequiresSectorUpdate,
    ];

    /// The label used in exported sheets and the history database.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::RequiresNameUpdate => "Requires name update",
            Self::RequiresSectorUpdate => "Requires sector update",
            Self::Add => "Add",
            Self::Remove => "Remove",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Category key used in summaries and trend reports.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Add => "missing_from_website",
            Self::Remove => "extra_on_website",
            Self::RequiresNameUpdate => "name_updates_needed",
            Self::RequiresSectorUpdate => "sector_updates_needed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorsMatch {
    Yes,
    No,
    NotApplicable,
}

impl fmt::Display for SectorsMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "Yes"),
            Self::No => write!(f, "No"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// One row of reconciliation output: a baseline record with its best website
/// match, or a website record nothing in the baseline matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedResult {
    /// Position in the baseline set; `None` for `Remove` rows.
    pub baseline_index: Option<usize>,
    pub cr_name: String,
    pub brand_name: String,
    pub website_name: String,
    pub baseline_sector: String,
    pub website_sector: String,
    pub match_score: f64,
    pub strategy: MatchStrategy,
    pub confidence: Confidence,
    pub matched_field: MatchedField,
    pub exists_on_website: bool,
    pub sectors_match: SectorsMatch,
    pub status: Status,
}

/// Projection of an observed record nothing in the baseline matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedCompany {
    pub name: String,
    pub sector: String,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub baseline_companies: usize,
    pub website_companies: usize,
    pub matched_companies: usize,
    pub accuracy_rate: f64,
}

/// Counts per status category, keyed the way trend reports key them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub ok: usize,
    pub missing_from_website: usize,
    pub extra_on_website: usize,
    pub name_updates_needed: usize,
    pub sector_updates_needed: usize,
}

impl StatusBreakdown {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Ok => self.ok,
            Status::Add => self.missing_from_website,
            Status::Remove => self.extra_on_website,
            Status::RequiresNameUpdate => self.name_updates_needed,
            Status::RequiresSectorUpdate => self.sector_updates_needed,
        }
    }

    pub fn increment(&mut self, status: Status) {
        match status {
            Status::Ok => self.ok += 1,
            Status::Add => self.missing_from_website += 1,
            Status::Remove => self.extra_on_website += 1,
            Status::RequiresNameUpdate => self.name_updates_needed += 1,
            Status::RequiresSectorUpdate => self.sector_updates_needed += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfectMatches {
    pub count: usize,
    pub percentage: f64,
    pub companies: Vec<MatchedCompany>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedCompany {
    pub cr_name: String,
    pub website_name: String,
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCompany {
    pub cr_name: String,
    pub brand_name: String,
    pub vrp_sector: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorDrift {
    pub cr_name: String,
    pub vrp_sector: String,
    pub website_sector: String,
}

/// A category count with up to `SAMPLE_LIMIT` representative rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sampled<T> {
    pub count: usize,
    pub companies: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub perfect_matches: PerfectMatches,
    pub missing_companies: Sampled<MissingCompany>,
    pub extra_companies: Sampled<UnmatchedCompany>,
    pub name_updates_needed: Sampled<MatchedCompany>,
    pub sector_updates_needed: Sampled<SectorDrift>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_date: String,
    pub baseline_file: String,
    pub totals: Totals,
    pub status_breakdown: StatusBreakdown,
    /// Keyed by confidence label (`high`, `medium`, `low`, `none`).
    pub confidence_breakdown: BTreeMap<String, usize>,
    /// Website records chosen as best match by more than one baseline record.
    pub shared_matches: usize,
    pub detailed_analysis: DetailedAnalysis,
}

// ---------------------------------------------------------------------------
// History + Trend
// ---------------------------------------------------------------------------

/// Run metadata handed to a store; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRun {
    pub baseline_file: String,
    pub total_baseline_companies: usize,
    pub total_website_companies: usize,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRun {
    pub id: i64,
    pub run_date: String,
    pub baseline_file: String,
    pub total_baseline_companies: usize,
    pub total_website_companies: usize,
    /// Serialized `RunSummary` as stored.
    pub summary_stats: String,
    pub created_at: String,
}

/// A persisted per-company row of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyHistoryRow {
    pub run_id: i64,
    pub cr_name: String,
    pub brand_name: String,
    pub website_name: String,
    pub vrp_sector: String,
    pub website_sector: String,
    pub match_score: f64,
    /// Status label as persisted; `None` if the stored label is not recognized.
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRun {
    pub run: ComparisonRun,
    pub companies: Vec<CompanyHistoryRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improved,
    Worsened,
    Same,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTrend {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for OverallTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Improving => write!(f, "improving"),
            Self::Declining => write!(f, "declining"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChange {
    pub current: usize,
    pub previous: usize,
    pub change: i64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalComparison {
    pub has_historical_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_run_id: Option<i64>,
    /// Keyed by status category (`ok`, `missing_from_website`, ...).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub changes: BTreeMap<String, CategoryChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_trend: Option<OverallTrend>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything one reconciliation invocation produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Store-assigned id; `None` when the run was not persisted.
    pub run_id: Option<i64>,
    pub engine_version: String,
    pub current_analysis: RunSummary,
    pub historical_comparison: HistoricalComparison,
    pub recommendations: Vec<String>,
}
