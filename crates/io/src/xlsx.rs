// Excel import/export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use roster_recon::engine::RecordTable;
use roster_recon::model::{ClassifiedResult, RunSummary, UnmatchedCompany};
use roster_recon::summary::round1;
use roster_recon::ReconError;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};

use crate::csv::input_name;
use crate::report::{
    result_row, summary_rows, unmatched_row, RESULTS_NAME, RESULT_HEADERS, SUMMARY_HEADERS,
    SUMMARY_NAME, UNMATCHED_HEADERS, UNMATCHED_NAME,
};

/// Column of `RESULT_HEADERS` written as a number rather than text.
const MATCH_SCORE_COL: u16 = 5;

/// Read the first worksheet; its first row is the header.
pub fn read_first_sheet(path: &Path) -> Result<RecordTable, ReconError> {
    let input = input_name(path);
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ReconError::Io(format!("Failed to open Excel file {input}: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReconError::Io(format!("{input}: Excel file contains no sheets")))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReconError::Io(format!("{input}: failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    let rows: Vec<Vec<String>> = rows
        .filter(|row| row.iter().any(|v| !v.trim().is_empty()))
        .collect();

    log::debug!("{input}: read {} rows from sheet '{sheet_name}'", rows.len());
    Ok(RecordTable::new(&input, headers, rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integers without decimals
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => n.to_string(),
        Data::Int(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Write the three report sheets to one workbook.
pub fn write_report(
    path: &Path,
    results: &[ClassifiedResult],
    unmatched: &[UnmatchedCompany],
    summary: &RunSummary,
) -> Result<(), ReconError> {
    let xlsx_err = |e: XlsxError| ReconError::Io(format!("{}: {e}", path.display()));
    let header = Format::new().set_bold();
    let mut workbook = XlsxWorkbook::new();

    let sheet = workbook.add_worksheet().set_name(RESULTS_NAME).map_err(xlsx_err)?;
    write_header(sheet, &RESULT_HEADERS, &header).map_err(xlsx_err)?;
    for (i, result) in results.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in result_row(result).iter().enumerate() {
            let col = col as u16;
            if col == MATCH_SCORE_COL {
                sheet
                    .write_number(row, col, round1(result.match_score))
                    .map_err(xlsx_err)?;
            } else {
                sheet.write_string(row, col, value).map_err(xlsx_err)?;
            }
        }
    }

    let sheet = workbook.add_worksheet().set_name(UNMATCHED_NAME).map_err(xlsx_err)?;
    write_header(sheet, &UNMATCHED_HEADERS, &header).map_err(xlsx_err)?;
    for (i, company) in unmatched.iter().enumerate() {
        write_strings(sheet, i as u32 + 1, &unmatched_row(company)).map_err(xlsx_err)?;
    }

    let sheet = workbook.add_worksheet().set_name(SUMMARY_NAME).map_err(xlsx_err)?;
    write_header(sheet, &SUMMARY_HEADERS, &header).map_err(xlsx_err)?;
    for (i, (metric, value)) in summary_rows(summary).into_iter().enumerate() {
        write_strings(sheet, i as u32 + 1, &[metric.to_string(), value]).map_err(xlsx_err)?;
    }

    workbook.save(path).map_err(xlsx_err)?;
    log::info!("wrote Excel report {}", path.display());
    Ok(())
}

fn write_header(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}

fn write_strings(sheet: &mut Worksheet, row: u32, values: &[String]) -> Result<(), XlsxError> {
    for (col, value) in values.iter().enumerate() {
        sheet.write_string(row, col as u16, value)?;
    }
    Ok(())
}
