// CSV import/export

use std::io::Read;
use std::path::{Path, PathBuf};

use roster_recon::engine::RecordTable;
use roster_recon::model::{ClassifiedResult, RunSummary, UnmatchedCompany};
use roster_recon::ReconError;

use crate::report::{
    result_row, summary_rows, unmatched_row, RESULT_HEADERS, SUMMARY_HEADERS, UNMATCHED_HEADERS,
};

pub const RESULTS_FILE: &str = "comparison_results.csv";
pub const UNMATCHED_FILE: &str = "unmatched_website_companies.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

pub fn read_table(path: &Path) -> Result<RecordTable, ReconError> {
    let content = read_file_as_utf8(path)?;
    RecordTable::from_csv(&input_name(path), &content)
}

pub fn read_file_as_utf8(path: &Path) -> Result<String, ReconError> {
    let io_err = |e: std::io::Error| ReconError::Io(format!("{}: {e}", path.display()));
    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            log::warn!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// File name used in error messages.
pub(crate) fn input_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write the results, unmatched and summary CSVs into `dir`, creating it if
/// needed. Returns the written paths.
pub fn export_dir(
    dir: &Path,
    results: &[ClassifiedResult],
    unmatched: &[UnmatchedCompany],
    summary: &RunSummary,
) -> Result<Vec<PathBuf>, ReconError> {
    std::fs::create_dir_all(dir).map_err(|e| ReconError::Io(format!("{}: {e}", dir.display())))?;

    let results_path = dir.join(RESULTS_FILE);
    write_rows(&results_path, &RESULT_HEADERS, results.iter().map(result_row))?;

    let unmatched_path = dir.join(UNMATCHED_FILE);
    write_rows(&unmatched_path, &UNMATCHED_HEADERS, unmatched.iter().map(unmatched_row))?;

    let summary_path = dir.join(SUMMARY_FILE);
    write_rows(
        &summary_path,
        &SUMMARY_HEADERS,
        summary_rows(summary)
            .into_iter()
            .map(|(metric, value)| [metric.to_string(), value]),
    )?;

    log::info!("exported CSV reports to {}", dir.display());
    Ok(vec![results_path, unmatched_path, summary_path])
}

fn write_rows<const N: usize>(
    path: &Path,
    headers: &[&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<(), ReconError> {
    let csv_err = |e: csv::Error| ReconError::Io(format!("{}: {e}", path.display()));
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(headers).map_err(csv_err)?;
    for row in rows {
        writer.write_record(&row).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))
}
