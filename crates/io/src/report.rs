//! Row projections shared by the CSV and Excel exports.

use roster_recon::model::{ClassifiedResult, RunSummary, UnmatchedCompany};
use roster_recon::summary::round1;

pub const RESULTS_NAME: &str = "Comparison Results";
pub const UNMATCHED_NAME: &str = "Unmatched Website Companies";
pub const SUMMARY_NAME: &str = "Summary";

pub const RESULT_HEADERS: [&str; 12] = [
    "CR Name",
    "Brand Name",
    "Website Name",
    "VRP Sector",
    "Website Sector",
    "Match Score",
    "Match Type",
    "Match Confidence",
    "Matched Field",
    "PC exist in website",
    "Sectors matching",
    "Status",
];

pub const UNMATCHED_HEADERS: [&str; 2] = ["Website Name", "Website Sector"];

pub const SUMMARY_HEADERS: [&str; 2] = ["Metric", "Value"];

pub fn result_row(result: &ClassifiedResult) -> [String; 12] {
    [
        result.cr_name.clone(),
        result.brand_name.clone(),
        result.website_name.clone(),
        result.baseline_sector.clone(),
        result.website_sector.clone(),
        round1(result.match_score).to_string(),
        result.strategy.to_string(),
        result.confidence.to_string(),
        result.matched_field.to_string(),
        if result.exists_on_website { "Yes" } else { "No" }.to_string(),
        result.sectors_match.to_string(),
        result.status.label().to_string(),
    ]
}

pub fn unmatched_row(company: &UnmatchedCompany) -> [String; 2] {
    [company.name.clone(), company.sector.clone()]
}

/// Totals as (metric, value) pairs.
pub fn summary_rows(summary: &RunSummary) -> Vec<(&'static str, String)> {
    let totals = &summary.totals;
    vec![
        ("Baseline Companies", totals.baseline_companies.to_string()),
        ("Website Companies", totals.website_companies.to_string()),
        ("Matched Companies", totals.matched_companies.to_string()),
        ("Accuracy Rate", format!("{:.1}", totals.accuracy_rate)),
    ]
}
