use std::collections::{HashMap, HashSet};

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::history::HistoryStore;
use crate::model::{
    BaselineRecord, ClassifiedResult, MatchOutcome, MatchedField, NewRun, ObservedRecord,
    ReconInput, RunReport, SectorsMatch, Status, UnmatchedCompany,
};
use crate::scorer::{score_forms, NameForms};
use crate::sector::SectorTable;
use crate::summary::build_summary;
use crate::trend;

/// Classified output of one `reconcile` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// One row per baseline record (in baseline order), then one `Remove`
    /// row per unconsumed observed record (in observed order).
    pub results: Vec<ClassifiedResult>,
    /// Observed records selected as best match by more than one baseline record.
    pub shared_matches: usize,
}

impl Reconciliation {
    /// The `Remove` rows projected to the website side.
    pub fn unmatched_observed(&self) -> Vec<UnmatchedCompany> {
        self.results
            .iter()
            .filter(|r| r.status == Status::Remove)
            .map(|r| UnmatchedCompany {
                name: r.website_name.clone(),
                sector: r.website_sector.clone(),
            })
            .collect()
    }

    /// Whether any row needs action.
    pub fn has_discrepancies(&self) -> bool {
        self.results.iter().any(|r| r.status != Status::Ok)
    }
}

/// Everything `run` produces: the classified rows and the combined report.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub reconciliation: Reconciliation,
    pub report: RunReport,
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Reconcile, summarize, persist and compare against the preceding run.
///
/// With `store = None` nothing is persisted and the report carries no
/// historical comparison.
pub fn run(
    config: &ReconConfig,
    input: &ReconInput,
    baseline_file: &str,
    store: Option<&mut dyn HistoryStore>,
) -> Result<RunOutput, ReconError> {
    let reconciliation = reconcile(&input.baseline, &input.observed, config);
    let mut summary = build_summary(
        &reconciliation.results,
        input.baseline.len(),
        input.observed.len(),
        baseline_file,
    );
    summary.shared_matches = reconciliation.shared_matches;

    let (run_id, historical_comparison) = match store {
        Some(store) => {
            let run_id = store.save_run(
                NewRun {
                    baseline_file: baseline_file.to_string(),
                    total_baseline_companies: input.baseline.len(),
                    total_website_companies: input.observed.len(),
                    summary: summary.clone(),
                },
                &reconciliation.results,
            )?;
            log::info!("saved run {run_id} ({} company rows)", reconciliation.results.len());
            let previous = store.run_before(1)?;
            (Some(run_id), trend::compare(&summary, previous.as_ref()))
        }
        None => (None, trend::disabled()),
    };

    let recommendations =
        trend::recommendations(&summary, &historical_comparison, &config.recommendations);

    Ok(RunOutput {
        reconciliation,
        report: RunReport {
            run_id,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            current_analysis: summary,
            historical_comparison,
            recommendations,
        },
    })
}

// ---------------------------------------------------------------------------
// Matching + classification
// ---------------------------------------------------------------------------

/// Match every baseline record against the observed set and classify it,
/// then emit every observed record no baseline record consumed.
///
/// Matching is greedy per baseline record: two baseline records may select
/// the same observed record. Consumption is keyed by observed name.
pub fn reconcile(
    baseline: &[BaselineRecord],
    observed: &[ObservedRecord],
    config: &ReconConfig,
) -> Reconciliation {
    log::info!(
        "reconciling {} baseline records against {} observed records",
        baseline.len(),
        observed.len()
    );

    let thresholds = &config.thresholds;
    let sectors = SectorTable::with_extra(&config.sectors);
    let observed_forms: Vec<NameForms> = observed.iter().map(|o| NameForms::of(&o.name)).collect();

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut selections: HashMap<usize, usize> = HashMap::new();
    let mut results = Vec::with_capacity(baseline.len() + observed.len());

    for (index, record) in baseline.iter().enumerate() {
        let cr = NameForms::of(&record.cr_name);
        let brand = NameForms::of(&record.brand_name);

        let result = match best_match(&cr, &brand, &observed_forms) {
            Some((observed_index, outcome)) if outcome.score >= thresholds.fuzzy_match => {
                let website = &observed[observed_index];
                consumed.insert(website.name.as_str());
                *selections.entry(observed_index).or_default() += 1;

                let sector = sectors.compare(&record.sector, &website.sector, thresholds.sector_match);
                let status = if outcome.score < thresholds.exact_match {
                    Status::RequiresNameUpdate
                } else if sector.is_match {
                    Status::Ok
                } else {
                    Status::RequiresSectorUpdate
                };

                log::debug!(
                    "'{}' -> '{}' ({} {:.1} via {}): {status}",
                    record.cr_name,
                    website.name,
                    outcome.strategy,
                    outcome.score,
                    outcome.matched_field
                );
                matched_row(index, record, website, outcome, sector.is_match, status)
            }
            best => {
                let outcome = best.map(|(_, o)| o).unwrap_or_else(MatchOutcome::unmatched);
                log::debug!(
                    "'{}' missing from website (best {:.1} via {})",
                    record.cr_name,
                    outcome.score,
                    outcome.strategy
                );
                missing_row(index, record, outcome)
            }
        };
        results.push(result);
    }

    for website in observed {
        if !consumed.contains(website.name.as_str()) {
            results.push(extra_row(website));
        }
    }

    let shared_matches = selections.values().filter(|&&n| n > 1).count();
    if shared_matches > 0 {
        log::info!("{shared_matches} website companies matched more than one baseline record");
    }

    Reconciliation {
        results,
        shared_matches,
    }
}

/// Best observed candidate for one baseline record. The first candidate
/// seeds the best; later candidates replace it only with a strictly
/// greater score.
fn best_match(
    cr: &NameForms,
    brand: &NameForms,
    observed: &[NameForms],
) -> Option<(usize, MatchOutcome)> {
    let mut best: Option<(usize, MatchOutcome)> = None;
    for (index, website) in observed.iter().enumerate() {
        let outcome = pair_outcome(cr, brand, website);
        let replace = match &best {
            Some((_, current)) => outcome.score > current.score,
            None => true,
        };
        if replace {
            best = Some((index, outcome));
        }
    }
    best
}

/// Higher of the CR-name and brand-name scores. Ties go to the CR name.
fn pair_outcome(cr: &NameForms, brand: &NameForms, website: &NameForms) -> MatchOutcome {
    let by_cr = score_forms(cr, website).with_field(MatchedField::CrName);
    let by_brand = score_forms(brand, website).with_field(MatchedField::BrandName);
    if by_brand.score > by_cr.score {
        by_brand
    } else {
        by_cr
    }
}

fn matched_row(
    index: usize,
    record: &BaselineRecord,
    website: &ObservedRecord,
    outcome: MatchOutcome,
    sectors_match: bool,
    status: Status,
) -> ClassifiedResult {
    ClassifiedResult {
        baseline_index: Some(index),
        cr_name: record.cr_name.clone(),
        brand_name: record.brand_name.clone(),
        website_name: website.name.clone(),
        baseline_sector: record.sector.clone(),
        website_sector: website.sector.clone(),
        match_score: outcome.score,
        strategy: outcome.strategy,
        confidence: outcome.confidence,
        matched_field: outcome.matched_field,
        exists_on_website: true,
        sectors_match: if sectors_match {
            SectorsMatch::Yes
        } else {
            SectorsMatch::No
        },
        status,
    }
}

fn missing_row(index: usize, record: &BaselineRecord, outcome: MatchOutcome) -> ClassifiedResult {
    ClassifiedResult {
        baseline_index: Some(index),
        cr_name: record.cr_name.clone(),
        brand_name: record.brand_name.clone(),
        website_name: String::new(),
        baseline_sector: record.sector.clone(),
        website_sector: String::new(),
        match_score: outcome.score,
        strategy: outcome.strategy,
        confidence: outcome.confidence,
        matched_field: outcome.matched_field,
        exists_on_website: false,
        sectors_match: SectorsMatch::NotApplicable,
        status: Status::Add,
    }
}

fn extra_row(website: &ObservedRecord) -> ClassifiedResult {
    let outcome = MatchOutcome::unmatched();
    ClassifiedResult {
        baseline_index: None,
        cr_name: String::new(),
        brand_name: String::new(),
        website_name: website.name.clone(),
        baseline_sector: String::new(),
        website_sector: website.sector.clone(),
        match_score: outcome.score,
        strategy: outcome.strategy,
        confidence: outcome.confidence,
        matched_field: outcome.matched_field,
        exists_on_website: true,
        sectors_match: SectorsMatch::NotApplicable,
        status: Status::Remove,
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Baseline sheet headers.
pub const CR_NAME_COLUMN: &str = "CR Name";
pub const BRAND_NAME_COLUMN: &str = "Brand Name";
pub const VRP_SECTOR_COLUMN: &str = "VRP Sector";
/// Observed sheet headers.
pub const COMPANY_COLUMN: &str = "Company";
pub const SECTOR_COLUMN: &str = "Sector";

/// A header row plus data rows, from a CSV file or a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    /// Source name used in error messages.
    pub input: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    pub fn new(input: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            input: input.into(),
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows,
        }
    }

    /// Parse CSV text whose first row is the header. Short rows are allowed.
    pub fn from_csv(input: &str, csv_data: &str) -> Result<Self, ReconError> {
        let csv_err = |e: csv::Error| ReconError::Csv {
            input: input.into(),
            message: e.to_string(),
        };

        // BOM from spreadsheet exports would otherwise stick to the first header.
        let csv_data = csv_data.strip_prefix('\u{feff}').unwrap_or(csv_data);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let headers = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(input, headers, rows))
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    fn required(&self, column: &str) -> Result<usize, ReconError> {
        self.optional(column).ok_or_else(|| ReconError::MissingColumn {
            input: self.input.clone(),
            column: column.into(),
        })
    }
}

/// Baseline records from a table. `CR Name` is required; `Brand Name` and
/// `VRP Sector` default to "" when absent.
pub fn load_baseline(table: &RecordTable) -> Result<Vec<BaselineRecord>, ReconError> {
    let cr_idx = table.required(CR_NAME_COLUMN)?;
    let brand_idx = table.optional(BRAND_NAME_COLUMN);
    let sector_idx = table.optional(VRP_SECTOR_COLUMN);

    Ok(table
        .rows
        .iter()
        .map(|row| BaselineRecord {
            cr_name: cell(row, Some(cr_idx)),
            brand_name: cell(row, brand_idx),
            sector: cell(row, sector_idx),
        })
        .collect())
}

/// Observed records from a table. `Company` is required; `Sector` defaults to "".
pub fn load_observed(table: &RecordTable) -> Result<Vec<ObservedRecord>, ReconError> {
    let name_idx = table.required(COMPANY_COLUMN)?;
    let sector_idx = table.optional(SECTOR_COLUMN);

    Ok(table
        .rows
        .iter()
        .map(|row| ObservedRecord {
            name: cell(row, Some(name_idx)),
            sector: cell(row, sector_idx),
        })
        .collect())
}

pub fn load_baseline_csv(input: &str, csv_data: &str) -> Result<Vec<BaselineRecord>, ReconError> {
    load_baseline(&RecordTable::from_csv(input, csv_data)?)
}

pub fn load_observed_csv(input: &str, csv_data: &str) -> Result<Vec<ObservedRecord>, ReconError> {
    load_observed(&RecordTable::from_csv(input, csv_data)?)
}

/// Trimmed cell value; missing cells and columns read as "".
fn cell(row: &[String], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;
    use crate::model::{Confidence, MatchStrategy, Trend};

    fn config() -> ReconConfig {
        ReconConfig::default()
    }

    fn find<'a>(results: &'a [ClassifiedResult], cr_name: &str) -> &'a ClassifiedResult {
        results
            .iter()
            .find(|r| r.cr_name == cr_name)
            .unwrap_or_else(|| panic!("no row for {cr_name}"))
    }

    #[test]
    fn exact_match_same_sector_is_ok() {
        let baseline = vec![BaselineRecord::new("Saudi Aramco", "Aramco", "Energy")];
        let observed = vec![ObservedRecord::new("Saudi Aramco Co.", "Oil")];

        let recon = reconcile(&baseline, &observed, &config());
        assert_eq!(recon.results.len(), 1);
        let row = &recon.results[0];
        assert_eq!(row.status, Status::Ok);
        assert_eq!(row.strategy, MatchStrategy::ExactNormalized);
        assert_eq!(row.matched_field, MatchedField::CrName);
        assert_eq!(row.sectors_match, SectorsMatch::Yes);
        assert!(row.exists_on_website);
        assert!(!recon.has_discrepancies());
    }

    #[test]
    fn sector_drift_requires_sector_update() {
        let baseline = vec![BaselineRecord::new("Saudi Aramco", "", "Energy")];
        let observed = vec![ObservedRecord::new("Saudi Aramco", "Healthcare")];

        let recon = reconcile(&baseline, &observed, &config());
        assert_eq!(recon.results[0].status, Status::RequiresSectorUpdate);
        assert_eq!(recon.results[0].sectors_match, SectorsMatch::No);
    }

    #[test]
    fn score_between_thresholds_requires_name_update() {
        // short substring match scores 88
        let baseline = vec![BaselineRecord::new("Tabuk Agr", "", "Retail")];
        let observed = vec![ObservedRecord::new("Tabuk Agro", "Retail")];

        let config = ReconConfig::from_toml("[thresholds]\nfuzzy_match = 85\n").unwrap();
        let recon = reconcile(&baseline, &observed, &config);
        let row = &recon.results[0];
        assert_eq!(row.status, Status::RequiresNameUpdate);
        assert_eq!(row.match_score, 88.0);
        assert_eq!(row.sectors_match, SectorsMatch::Yes);
    }

    #[test]
    fn brand_name_used_when_it_scores_higher() {
        let baseline = vec![BaselineRecord::new(
            "Saudi Telecom Company",
            "stc",
            "Telecom",
        )];
        let observed = vec![ObservedRecord::new("STC", "Telecommunications")];

        let recon = reconcile(&baseline, &observed, &config());
        let row = &recon.results[0];
        assert_eq!(row.matched_field, MatchedField::BrandName);
        assert_eq!(row.match_score, 100.0);
        assert_eq!(row.status, Status::Ok);
    }

    #[test]
    fn tie_between_cr_and_brand_goes_to_cr() {
        let baseline = vec![BaselineRecord::new("Ma'aden", "Maaden", "Mining")];
        let observed = vec![ObservedRecord::new("Ma aden", "Mining")];
        let recon = reconcile(&baseline, &observed, &config());
        assert_eq!(recon.results[0].matched_field, MatchedField::CrName);

        let baseline = vec![BaselineRecord::new("Almarai", "Almarai", "Retail")];
        let observed = vec![ObservedRecord::new("Almarai", "Retail")];
        let recon = reconcile(&baseline, &observed, &config());
        assert_eq!(recon.results[0].matched_field, MatchedField::CrName);
    }

    #[test]
    fn first_best_candidate_wins_ties() {
        let baseline = vec![BaselineRecord::new("Almarai", "", "Retail")];
        let observed = vec![
            ObservedRecord::new("Almarai Company", "Retail"),
            ObservedRecord::new("Almarai", "Food"),
        ];

        let recon = reconcile(&baseline, &observed, &config());
        assert_eq!(recon.results[0].website_name, "Almarai Company");
        // second observed record is untouched and becomes a Remove row
        assert_eq!(recon.results.len(), 2);
        assert_eq!(recon.results[1].status, Status::Remove);
        assert_eq!(recon.results[1].website_name, "Almarai");
    }

    #[test]
    fn no_observed_records_means_add_with_no_website_side() {
        let baseline = vec![BaselineRecord::new("Red Sea Global", "", "Real Estate")];
        let recon = reconcile(&baseline, &[], &config());
        let row = &recon.results[0];
        assert_eq!(row.status, Status::Add);
        assert_eq!(row.strategy, MatchStrategy::None);
        assert_eq!(row.confidence, Confidence::None);
        assert_eq!(row.matched_field, MatchedField::NotApplicable);
        assert_eq!(row.website_name, "");
        assert_eq!(row.sectors_match, SectorsMatch::NotApplicable);
        assert!(!row.exists_on_website);
    }

    #[test]
    fn below_threshold_keeps_best_outcome_on_add_row() {
        let baseline = vec![BaselineRecord::new("Zed", "", "Technology")];
        let observed = vec![ObservedRecord::new("Zenith Holdings", "Technology")];

        let recon = reconcile(&baseline, &observed, &config());
        let row = &recon.results[0];
        assert_eq!(row.status, Status::Add);
        assert_eq!(row.strategy, MatchStrategy::LengthMismatch);
        assert_eq!(row.match_score, 0.0);
        assert_eq!(row.website_name, "");
        assert_eq!(recon.results[1].status, Status::Remove);
    }

    #[test]
    fn shared_observed_match_is_preserved() {
        let baseline = vec![
            BaselineRecord::new("Almarai", "", "Retail"),
            BaselineRecord::new("Almarai Co", "", "Retail"),
        ];
        let observed = vec![ObservedRecord::new("Almarai", "Retail")];

        let recon = reconcile(&baseline, &observed, &config());
        assert_eq!(recon.results.len(), 2);
        assert!(recon.results.iter().all(|r| r.status == Status::Ok));
        assert_eq!(recon.shared_matches, 1);
    }

    #[test]
    fn consumption_is_keyed_by_name() {
        // Two observed rows share a name; matching one consumes both.
        let baseline = vec![BaselineRecord::new("Almarai", "", "Retail")];
        let observed = vec![
            ObservedRecord::new("Almarai", "Retail"),
            ObservedRecord::new("Almarai", "Food"),
        ];

        let recon = reconcile(&baseline, &observed, &config());
        assert_eq!(recon.results.len(), 1);
        assert!(recon.unmatched_observed().is_empty());
    }

    #[test]
    fn unmatched_observed_projection() {
        let baseline = vec![BaselineRecord::new("Almarai", "", "Retail")];
        let observed = vec![
            ObservedRecord::new("Jarir Bookstore", "Retail"),
            ObservedRecord::new("Almarai", "Retail"),
            ObservedRecord::new("Bupa Arabia", "Healthcare"),
        ];

        let recon = reconcile(&baseline, &observed, &config());
        let extra = recon.unmatched_observed();
        assert_eq!(
            extra,
            vec![
                UnmatchedCompany {
                    name: "Jarir Bookstore".into(),
                    sector: "Retail".into()
                },
                UnmatchedCompany {
                    name: "Bupa Arabia".into(),
                    sector: "Healthcare".into()
                },
            ]
        );
        let remove = find(&recon.results, "");
        assert_eq!(remove.match_score, 0.0);
        assert_eq!(remove.baseline_index, None);
    }

    #[test]
    fn configured_sector_alias_applies() {
        let config = ReconConfig::from_toml("[sectors]\nmining = [\"metals\"]\n").unwrap();
        let baseline = vec![BaselineRecord::new("Ma'aden", "", "Mining")];
        let observed = vec![ObservedRecord::new("Ma'aden", "Metals")];

        assert_eq!(
            reconcile(&baseline, &observed, &config).results[0].status,
            Status::Ok
        );
        assert_eq!(
            reconcile(&baseline, &observed, &ReconConfig::default()).results[0].status,
            Status::RequiresSectorUpdate
        );
    }

    #[test]
    fn run_without_store_has_no_history() {
        let input = ReconInput {
            baseline: vec![BaselineRecord::new("Almarai", "", "Retail")],
            observed: vec![ObservedRecord::new("Almarai", "Retail")],
        };
        let output = run(&config(), &input, "baseline.csv", None).unwrap();
        assert_eq!(output.report.run_id, None);
        assert!(!output.report.historical_comparison.has_historical_data);
        assert_eq!(output.report.current_analysis.totals.accuracy_rate, 100.0);
        assert_eq!(output.report.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn run_compares_against_previous_run() {
        let mut store = MemoryStore::default();
        let first = ReconInput {
            baseline: vec![
                BaselineRecord::new("Almarai", "", "Retail"),
                BaselineRecord::new("Jarir Bookstore", "", "Retail"),
            ],
            observed: vec![],
        };
        let output = run(&config(), &first, "q1.csv", Some(&mut store)).unwrap();
        assert_eq!(output.report.run_id, Some(1));
        assert!(!output.report.historical_comparison.has_historical_data);

        let second = ReconInput {
            observed: vec![ObservedRecord::new("Almarai", "Retail")],
            ..first
        };
        let output = run(&config(), &second, "q2.csv", Some(&mut store)).unwrap();
        assert_eq!(output.report.run_id, Some(2));
        let history = &output.report.historical_comparison;
        assert!(history.has_historical_data);
        assert_eq!(history.previous_run_id, Some(1));
        let missing = history.changes["missing_from_website"];
        assert_eq!((missing.previous, missing.current, missing.change), (2, 1, -1));
        assert_eq!(missing.trend, Trend::Improved);
    }

    #[test]
    fn load_baseline_with_optional_columns_missing() {
        let csv = "CR Name,Notes\nAlmarai,x\n\"Jarir, Marketing\",\n";
        let rows = load_baseline_csv("baseline.csv", csv).unwrap();
        assert_eq!(
            rows,
            vec![
                BaselineRecord::new("Almarai", "", ""),
                BaselineRecord::new("Jarir, Marketing", "", ""),
            ]
        );
    }

    #[test]
    fn load_baseline_full() {
        let csv = "\u{feff}CR Name,Brand Name,VRP Sector\n Saudi Telecom Company ,stc,Telecom\nAlmarai\n";
        let rows = load_baseline_csv("baseline.csv", csv).unwrap();
        assert_eq!(rows[0], BaselineRecord::new("Saudi Telecom Company", "stc", "Telecom"));
        // short row: missing cells read as ""
        assert_eq!(rows[1], BaselineRecord::new("Almarai", "", ""));
    }

    #[test]
    fn load_observed_keeps_duplicates() {
        let csv = "Sector,Company\nRetail,Almarai\nFood,Almarai\n";
        let rows = load_observed_csv("website.csv", csv).unwrap();
        assert_eq!(
            rows,
            vec![
                ObservedRecord::new("Almarai", "Retail"),
                ObservedRecord::new("Almarai", "Food"),
            ]
        );
    }

    #[test]
    fn load_from_prebuilt_table() {
        let table = RecordTable::new(
            "roster.xlsx",
            vec![" Company ".into(), "Sector".into()],
            vec![vec!["Almarai".into()], vec!["Bupa Arabia".into(), "Healthcare".into()]],
        );
        let rows = load_observed(&table).unwrap();
        assert_eq!(rows[0], ObservedRecord::new("Almarai", ""));
        assert_eq!(rows[1], ObservedRecord::new("Bupa Arabia", "Healthcare"));
    }

    #[test]
    fn load_missing_required_column() {
        let err = load_observed_csv("website.csv", "Name,Sector\nAlmarai,Retail\n").unwrap_err();
        match err {
            ReconError::MissingColumn { input, column } => {
                assert_eq!(input, "website.csv");
                assert_eq!(column, "Company");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }

        let err = load_baseline_csv("baseline.csv", "Brand Name\nstc\n").unwrap_err();
        assert!(err.to_string().contains("'CR Name'"));
    }
}
