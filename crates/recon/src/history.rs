use crate::error::ReconError;
use crate::model::{ClassifiedResult, CompanyHistoryRow, ComparisonRun, NewRun, StoredRun};
use crate::summary::{round1, RUN_DATE_FORMAT};

/// Append-only store of reconciliation runs and their per-company rows.
pub trait HistoryStore {
    /// Persist a run and all of its rows as one unit. Returns the new run id.
    fn save_run(&mut self, run: NewRun, results: &[ClassifiedResult]) -> Result<i64, ReconError>;

    /// The run `n` positions back from the latest (`0` = latest), with its
    /// company rows. `None` if fewer than `n + 1` runs exist.
    fn run_before(&self, n: usize) -> Result<Option<StoredRun>, ReconError>;
}

/// Company rows as persisted: status by label, score rounded to one decimal.
pub fn history_rows(run_id: i64, results: &[ClassifiedResult]) -> Vec<CompanyHistoryRow> {
    results
        .iter()
        .map(|r| CompanyHistoryRow {
            run_id,
            cr_name: r.cr_name.clone(),
            brand_name: r.brand_name.clone(),
            website_name: r.website_name.clone(),
            vrp_sector: r.baseline_sector.clone(),
            website_sector: r.website_sector.clone(),
            match_score: round1(r.match_score),
            status: Some(r.status),
        })
        .collect()
}

/// In-process store. Used by tests and by callers that do not keep history
/// across invocations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    runs: Vec<StoredRun>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl HistoryStore for MemoryStore {
    fn save_run(&mut self, run: NewRun, results: &[ClassifiedResult]) -> Result<i64, ReconError> {
        let summary_stats = serde_json::to_string(&run.summary)?;
        let id = self.runs.len() as i64 + 1;
        let created_at = chrono::Utc::now().format(RUN_DATE_FORMAT).to_string();

        self.runs.push(StoredRun {
            run: ComparisonRun {
                id,
                run_date: run.summary.run_date.clone(),
                baseline_file: run.baseline_file,
                total_baseline_companies: run.total_baseline_companies,
                total_website_companies: run.total_website_companies,
                summary_stats,
                created_at,
            },
            companies: history_rows(id, results),
        });
        Ok(id)
    }

    fn run_before(&self, n: usize) -> Result<Option<StoredRun>, ReconError> {
        Ok(self.runs.iter().rev().nth(n).cloned())
    }
}
