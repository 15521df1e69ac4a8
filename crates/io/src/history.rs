// Run history in SQLite

use std::path::{Path, PathBuf};

use roster_recon::history::{history_rows, HistoryStore};
use roster_recon::model::{ClassifiedResult, CompanyHistoryRow, ComparisonRun, NewRun, Status, StoredRun};
use roster_recon::ReconError;
use rusqlite::{params, Connection, OptionalExtension};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS comparison_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_date TEXT NOT NULL,
    baseline_file TEXT NOT NULL,
    total_baseline_companies INTEGER,
    total_website_companies INTEGER,
    summary_stats TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS company_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER,
    cr_name TEXT,
    brand_name TEXT,
    website_name TEXT,
    vrp_sector TEXT,
    website_sector TEXT,
    match_score REAL,
    status TEXT,               -- 'OK', 'Requires name update', 'Requires sector update', 'Add', 'Remove'
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (run_id) REFERENCES comparison_runs (id)
);

CREATE INDEX IF NOT EXISTS company_history_run ON company_history (run_id);
"#;

pub const DEFAULT_DB_FILE: &str = "comparison_history.db";

/// `<data dir>/roster/comparison_history.db`, or the file name alone when
/// the platform has no data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("roster").join(DEFAULT_DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

fn store_err(e: rusqlite::Error) -> ReconError {
    ReconError::Store(e.to_string())
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) a history database at `path`.
    pub fn open(path: &Path) -> Result<Self, ReconError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ReconError::Io(format!("{}: {e}", parent.display())))?;
        }
        let conn = Connection::open(path).map_err(store_err)?;
        log::debug!("opened history database {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, ReconError> {
        Self::init(Connection::open_in_memory().map_err(store_err)?)
    }

    fn init(conn: Connection) -> Result<Self, ReconError> {
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        Ok(Self { conn })
    }

    pub fn run_count(&self) -> Result<usize, ReconError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comparison_runs", [], |row| row.get(0))
            .map_err(store_err)?;
        Ok(count as usize)
    }

    fn companies(&self, run_id: i64) -> Result<Vec<CompanyHistoryRow>, ReconError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT run_id, cr_name, brand_name, website_name, vrp_sector, website_sector, match_score, status
                 FROM company_history WHERE run_id = ?1 ORDER BY id",
            )
            .map_err(store_err)?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                let status: Option<String> = row.get(7)?;
                Ok(CompanyHistoryRow {
                    run_id: row.get(0)?,
                    cr_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    brand_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    website_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    vrp_sector: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    website_sector: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    match_score: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
                    status: status.as_deref().and_then(Status::from_label),
                })
            })
            .map_err(store_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(store_err)
    }
}

impl HistoryStore for SqliteStore {
    fn save_run(&mut self, run: NewRun, results: &[ClassifiedResult]) -> Result<i64, ReconError> {
        let summary_stats = serde_json::to_string(&run.summary)?;

        // Dropping the transaction on any early return rolls it back.
        let tx = self.conn.transaction().map_err(store_err)?;
        tx.execute(
            "INSERT INTO comparison_runs
             (run_date, baseline_file, total_baseline_companies, total_website_companies, summary_stats)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run.summary.run_date,
                run.baseline_file,
                run.total_baseline_companies as i64,
                run.total_website_companies as i64,
                summary_stats,
            ],
        )
        .map_err(store_err)?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO company_history
                     (run_id, cr_name, brand_name, website_name, vrp_sector, website_sector, match_score, status)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .map_err(store_err)?;
            for row in history_rows(run_id, results) {
                stmt.execute(params![
                    row.run_id,
                    row.cr_name,
                    row.brand_name,
                    row.website_name,
                    row.vrp_sector,
                    row.website_sector,
                    row.match_score,
                    row.status.map(|s| s.label()),
                ])
                .map_err(store_err)?;
            }
        }

        tx.commit().map_err(store_err)?;
        log::info!("history: stored run {run_id} with {} company rows", results.len());
        Ok(run_id)
    }

    fn run_before(&self, n: usize) -> Result<Option<StoredRun>, ReconError> {
        let run = self
            .conn
            .query_row(
                "SELECT id, run_date, baseline_file, total_baseline_companies, total_website_companies,
                        summary_stats, created_at
                 FROM comparison_runs ORDER BY id DESC LIMIT 1 OFFSET ?1",
                params![n as i64],
                |row| {
                    Ok(ComparisonRun {
                        id: row.get(0)?,
                        run_date: row.get(1)?,
                        baseline_file: row.get(2)?,
                        total_baseline_companies: row.get::<_, Option<i64>>(3)?.unwrap_or(0) as usize,
                        total_website_companies: row.get::<_, Option<i64>>(4)?.unwrap_or(0) as usize,
                        summary_stats: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                        created_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                    })
                },
            )
            .optional()
            .map_err(store_err)?;

        match run {
            Some(run) => {
                let companies = self.companies(run.id)?;
                Ok(Some(StoredRun { run, companies }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_recon::model::{BaselineRecord, ObservedRecord};
    use roster_recon::summary::build_summary;
    use roster_recon::{reconcile, ReconConfig};

    fn sample_run(label: &str, observed: &[ObservedRecord]) -> (NewRun, Vec<ClassifiedResult>) {
        let baseline = vec![
            BaselineRecord::new("Almarai", "", "Retail"),
            BaselineRecord::new("Red Sea Global", "", "Real Estate"),
        ];
        let recon = reconcile(&baseline, observed, &ReconConfig::default());
        let summary = build_summary(&recon.results, baseline.len(), observed.len(), label);
        (
            NewRun {
                baseline_file: label.into(),
                total_baseline_companies: baseline.len(),
                total_website_companies: observed.len(),
                summary,
            },
            recon.results,
        )
    }

    #[test]
    fn save_and_read_back() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(store.run_before(0).unwrap().is_none());

        let observed = vec![
            ObservedRecord::new("Almarai", "Retail"),
            ObservedRecord::new("Jarir Bookstore", "Retail"),
        ];
        let (run, results) = sample_run("q1.csv", &observed);
        let id = store.save_run(run, &results).unwrap();
        assert_eq!(id, 1);

        let stored = store.run_before(0).unwrap().unwrap();
        assert_eq!(stored.run.id, 1);
        assert_eq!(stored.run.baseline_file, "q1.csv");
        assert_eq!(stored.run.total_baseline_companies, 2);
        assert_eq!(stored.run.total_website_companies, 2);
        assert!(!stored.run.created_at.is_empty());

        let statuses: Vec<Option<Status>> = stored.companies.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![Some(Status::Ok), Some(Status::Add), Some(Status::Remove)]
        );
        assert_eq!(stored.companies[0].match_score, 100.0);
        assert_eq!(stored.companies[2].website_name, "Jarir Bookstore");

        let summary: serde_json::Value = serde_json::from_str(&stored.run.summary_stats).unwrap();
        assert_eq!(summary["status_breakdown"]["missing_from_website"], 1);
    }

    #[test]
    fn run_before_offsets_from_latest() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for label in ["q1.csv", "q2.csv", "q3.csv"] {
            let (run, results) = sample_run(label, &[]);
            store.save_run(run, &results).unwrap();
        }

        assert_eq!(store.run_count().unwrap(), 3);
        assert_eq!(store.run_before(0).unwrap().unwrap().run.baseline_file, "q3.csv");
        assert_eq!(store.run_before(1).unwrap().unwrap().run.baseline_file, "q2.csv");
        assert_eq!(store.run_before(2).unwrap().unwrap().run.baseline_file, "q1.csv");
        assert!(store.run_before(3).unwrap().is_none());
    }

    #[test]
    fn failed_save_leaves_no_partial_run() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let (run, results) = sample_run("q1.csv", &[]);
        store.save_run(run, &results).unwrap();

        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_red_sea BEFORE INSERT ON company_history
                 WHEN NEW.cr_name = 'Red Sea Global'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let (run, results) = sample_run("q2.csv", &[]);
        let err = store.save_run(run, &results).unwrap_err();
        assert!(matches!(err, ReconError::Store(_)));
        assert!(err.to_string().contains("rejected"));

        assert_eq!(store.run_count().unwrap(), 1);
        let latest = store.run_before(0).unwrap().unwrap();
        assert_eq!(latest.run.baseline_file, "q1.csv");
        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM company_history", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn reopen_file_keeps_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_DB_FILE);

        {
            let mut store = SqliteStore::open(&path).unwrap();
            let (run, results) = sample_run("q1.csv", &[]);
            store.save_run(run, &results).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let stored = store.run_before(0).unwrap().unwrap();
        assert_eq!(stored.run.baseline_file, "q1.csv");
        assert_eq!(stored.companies.len(), 2);
    }

    #[test]
    fn unknown_status_label_reads_as_none() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let (run, results) = sample_run("q1.csv", &[]);
        store.save_run(run, &results).unwrap();
        store
            .conn
            .execute("UPDATE company_history SET status = 'Archived' WHERE id = 1", [])
            .unwrap();

        let stored = store.run_before(0).unwrap().unwrap();
        assert_eq!(stored.companies[0].status, None);
        assert_eq!(stored.companies[1].status, Some(Status::Add));
    }

    #[test]
    fn default_path_ends_with_db_file() {
        assert!(default_db_path().ends_with(DEFAULT_DB_FILE));
    }
}
