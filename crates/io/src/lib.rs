// Roster I/O: input tables, report export, run history

pub mod csv;
pub mod history;
pub mod report;
pub mod xlsx;

use std::path::Path;

use roster_recon::engine::RecordTable;
use roster_recon::ReconError;

pub use history::SqliteStore;

/// Spreadsheet extensions read through calamine; anything else is CSV.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read an input table, picking the reader by file extension.
pub fn read_table(path: &Path) -> Result<RecordTable, ReconError> {
    if is_spreadsheet(path) {
        crate::xlsx::read_first_sheet(path)
    } else {
        crate::csv::read_table(path)
    }
}
