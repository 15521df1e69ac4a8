//! `roster` subcommands: run, validate, score, history.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use roster_io::SqliteStore;
use roster_recon::engine::{load_baseline, load_observed};
use roster_recon::model::{RunSummary, Status};
use roster_recon::scorer::explain;
use roster_recon::{HistoryStore, ReconConfig, ReconError, ReconInput};

use crate::exit_codes::{
    recon_exit_code, EXIT_RECON_DISCREPANCIES, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_RUNTIME,
    EXIT_RECON_STORE, EXIT_USAGE,
};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Reconcile a baseline roster against the roster published on the website
    #[command(after_help = "\
Examples:
  roster run baseline.csv website.csv
  roster run baseline.xlsx website.xlsx --config roster.toml --json
  roster run baseline.csv website.csv --export-dir out/ --xlsx out/report.xlsx
  roster run baseline.csv website.csv --no-history --strict")]
    Run {
        /// Baseline roster (CR Name, Brand Name, VRP Sector). CSV or Excel
        baseline: PathBuf,

        /// Website roster (Company, Sector). CSV or Excel
        observed: PathBuf,

        /// TOML config with thresholds, sector aliases and history settings
        #[arg(long, env = "ROSTER_CONFIG")]
        config: Option<PathBuf>,

        /// History database (default: [history].path, then the user data dir)
        #[arg(long, conflicts_with = "no_history")]
        db: Option<PathBuf>,

        /// Do not record this run or compare it against earlier runs
        #[arg(long)]
        no_history: bool,

        /// Name recorded for the baseline file (default: its file name)
        #[arg(long)]
        label: Option<String>,

        /// Output the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write comparison_results.csv, unmatched_website_companies.csv and summary.csv here
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Write all three report sheets to one Excel workbook
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Exit with code 6 when any company needs action
        #[arg(long)]
        strict: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  roster validate roster.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },

    /// Score one pair of names and show how the score was reached
    #[command(after_help = "\
Examples:
  roster score \"The Saudi Technology Company\" \"Saudi Technology\"
  roster score ABC \"Alpha Beta Corp (ABC)\" --json")]
    Score {
        /// Baseline name (CR name or brand name)
        baseline_name: String,

        /// Name as published on the website
        website_name: String,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a stored run
    #[command(after_help = "\
Examples:
  roster history
  roster history --back 1 --json
  roster history --db comparison_history.db")]
    History {
        /// History database (default: the user data dir)
        #[arg(long)]
        db: Option<PathBuf>,

        /// How many runs back from the latest (0 = latest)
        #[arg(long, default_value_t = 0)]
        back: usize,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run {
            baseline,
            observed,
            config,
            db,
            no_history,
            label,
            json,
            output,
            export_dir,
            xlsx,
            strict,
        } => cmd_run(RunArgs {
            baseline,
            observed,
            config,
            db,
            no_history,
            label,
            json,
            output,
            export_dir,
            xlsx,
            strict,
        }),
        ReconCommands::Validate { config } => cmd_validate(config),
        ReconCommands::Score { baseline_name, website_name, json } => {
            cmd_score(&baseline_name, &website_name, json)
        }
        ReconCommands::History { db, back, json } => cmd_history(db, back, json),
    }
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumn { .. } => Some(
                "baseline needs 'CR Name' (optional 'Brand Name', 'VRP Sector'); website needs 'Company' (optional 'Sector')"
                    .to_string(),
            ),
            ReconError::Store(_) => Some("pass --no-history to run without the history database".to_string()),
            _ => None,
        };
        CliError { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

struct RunArgs {
    baseline: PathBuf,
    observed: PathBuf,
    config: Option<PathBuf>,
    db: Option<PathBuf>,
    no_history: bool,
    label: Option<String>,
    json: bool,
    output: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    xlsx: Option<PathBuf>,
    strict: bool,
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        recon_err(EXIT_RECON_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    Ok(ReconConfig::from_toml(&config_str)?)
}

/// `--db`, then `[history].path` relative to the config file, then the
/// per-user default.
fn resolve_db_path(db: Option<PathBuf>, config: &ReconConfig, config_path: Option<&Path>) -> PathBuf {
    if let Some(db) = db {
        return db;
    }
    match &config.history.path {
        Some(path) => {
            let base_dir = config_path
                .and_then(Path::parent)
                .unwrap_or_else(|| Path::new("."));
            base_dir.join(path)
        }
        None => roster_io::history::default_db_path(),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    let baseline = load_baseline(&roster_io::read_table(&args.baseline)?)?;
    let observed = load_observed(&roster_io::read_table(&args.observed)?)?;
    log::info!(
        "loaded {} baseline and {} website companies",
        baseline.len(),
        observed.len()
    );
    let input = ReconInput { baseline, observed };
    let label = args.label.unwrap_or_else(|| file_label(&args.baseline));

    let mut store = if args.no_history {
        None
    } else {
        let path = resolve_db_path(args.db, &config, args.config.as_deref());
        log::info!("history database {}", path.display());
        let store = SqliteStore::open(&path).map_err(|e| {
            recon_err(EXIT_RECON_STORE, format!("cannot open history database {}: {e}", path.display()))
                .with_hint("pass --no-history to run without the history database")
        })?;
        Some(store)
    };

    let output = roster_recon::run(
        &config,
        &input,
        &label,
        store.as_mut().map(|s| s as &mut dyn HistoryStore),
    )?;
    let report = &output.report;
    let summary = &report.current_analysis;

    if args.json || args.output.is_some() {
        let json_str = serde_json::to_string_pretty(report)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str)
                .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if args.json {
            println!("{json_str}");
        }
    }

    let unmatched = output.reconciliation.unmatched_observed();

    if let Some(ref dir) = args.export_dir {
        let written =
            roster_io::csv::export_dir(dir, &output.reconciliation.results, &unmatched, summary)?;
        for path in written {
            eprintln!("wrote {}", path.display());
        }
    }

    if let Some(ref path) = args.xlsx {
        roster_io::xlsx::write_report(path, &output.reconciliation.results, &unmatched, summary)?;
        eprintln!("wrote {}", path.display());
    }

    print_run_summary(summary, report);

    if args.strict && output.reconciliation.has_discrepancies() {
        return Err(recon_err(EXIT_RECON_DISCREPANCIES, "discrepancies found"));
    }

    Ok(())
}

/// Human summary to stderr.
fn print_run_summary(summary: &RunSummary, report: &roster_recon::RunReport) {
    let totals = &summary.totals;
    let b = &summary.status_breakdown;
    eprintln!(
        "{}/{} baseline companies found on website ({:.1}%): {} ok, {} name updates, {} sector updates, {} missing, {} extra",
        totals.matched_companies,
        totals.baseline_companies,
        totals.accuracy_rate,
        b.ok,
        b.name_updates_needed,
        b.sector_updates_needed,
        b.missing_from_website,
        b.extra_on_website,
    );
    if summary.shared_matches > 0 {
        eprintln!(
            "note: {} website companies were best match for more than one baseline company",
            summary.shared_matches
        );
    }

    let history = &report.historical_comparison;
    match (report.run_id, history.previous_run_id, history.overall_trend) {
        (Some(id), Some(prev), Some(trend)) => {
            eprintln!("run {id} saved; {trend} since run {prev}");
        }
        (Some(id), _, _) => eprintln!("run {id} saved; no earlier run to compare"),
        (None, _, _) => {}
    }

    for rec in &report.recommendations {
        eprintln!("  - {rec}");
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    let t = &config.thresholds;
    let aliases: usize = config.sectors.values().map(Vec::len).sum();
    eprintln!(
        "valid: fuzzy {} / sector {} / exact {}, {} extra sector alias(es)",
        t.fuzzy_match, t.sector_match, t.exact_match, aliases,
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// score
// ---------------------------------------------------------------------------

fn cmd_score(baseline_name: &str, website_name: &str, json: bool) -> Result<(), CliError> {
    let explanation = explain(baseline_name, website_name);

    if json {
        let json_str = serde_json::to_string_pretty(&explanation)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    let outcome = &explanation.outcome;
    println!("baseline:    {:?}", explanation.baseline);
    println!("  normalized {:?}", explanation.normalized_baseline);
    println!("  core       {:?}", explanation.core_baseline);
    println!("website:     {:?}", explanation.website);
    println!("  normalized {:?}", explanation.normalized_website);
    println!("  core       {:?}", explanation.core_website);
    println!("strategy:    {}", outcome.strategy);
    println!("score:       {:.1}", outcome.score);
    println!("confidence:  {}", outcome.confidence);
    Ok(())
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

fn cmd_history(db: Option<PathBuf>, back: usize, json: bool) -> Result<(), CliError> {
    let path = db.unwrap_or_else(roster_io::history::default_db_path);
    if !path.exists() {
        return Err(recon_err(
            EXIT_RECON_STORE,
            format!("no history database at {}", path.display()),
        )
        .with_hint("runs are recorded by `roster run` unless --no-history is given"));
    }

    let store = SqliteStore::open(&path)?;
    let Some(stored) = store.run_before(back)? else {
        let count = store.run_count()?;
        return Err(recon_err(
            EXIT_USAGE,
            format!("no run {back} back from the latest ({count} stored)"),
        ));
    };

    if json {
        let json_str = serde_json::to_string_pretty(&stored)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    let run = &stored.run;
    println!(
        "run {}  {}  {}  ({} baseline, {} website)",
        run.id,
        run.run_date,
        run.baseline_file,
        run.total_baseline_companies,
        run.total_website_companies,
    );

    // Accuracy lives in the stored summary; older rows may not parse.
    if let Ok(summary) = serde_json::from_str::<RunSummary>(&run.summary_stats) {
        println!("accuracy: {:.1}%", summary.totals.accuracy_rate);
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for company in &stored.companies {
        let label = company.status.as_ref().map(Status::label).unwrap_or("unknown");
        *counts.entry(label).or_default() += 1;
    }
    for (label, count) in counts {
        println!("  {label:<24} {count}");
    }
    Ok(())
}
