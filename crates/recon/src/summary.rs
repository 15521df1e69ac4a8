use std::collections::BTreeMap;

use crate::model::{
    ClassifiedResult, DetailedAnalysis, MatchedCompany, MissingCompany, PerfectMatches, RunSummary,
    Sampled, SectorDrift, Status, StatusBreakdown, Totals, UnmatchedCompany,
};

/// Representative rows kept per category.
pub const SAMPLE_LIMIT: usize = 10;

pub const RUN_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Aggregate classified rows into a run summary.
///
/// Accuracy is matched baseline records over `baseline_count`, as a
/// percentage rounded to one decimal (0 for an empty baseline). Samples keep
/// result order. `shared_matches` is left at 0; the engine fills it in.
pub fn build_summary(
    results: &[ClassifiedResult],
    baseline_count: usize,
    observed_count: usize,
    baseline_file: &str,
) -> RunSummary {
    let mut status_breakdown = StatusBreakdown::default();
    let mut confidence_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for result in results {
        status_breakdown.increment(result.status);
        *confidence_breakdown
            .entry(result.confidence.to_string())
            .or_default() += 1;
    }

    let matched_companies = results
        .iter()
        .filter(|r| r.baseline_index.is_some() && r.exists_on_website)
        .count();

    let with_status = |status: Status| results.iter().filter(move |r| r.status == status);

    let perfect_matches = PerfectMatches {
        count: status_breakdown.ok,
        percentage: percentage(status_breakdown.ok, baseline_count),
        companies: with_status(Status::Ok)
            .take(SAMPLE_LIMIT)
            .map(matched_company)
            .collect(),
    };

    let detailed_analysis = DetailedAnalysis {
        perfect_matches,
        missing_companies: Sampled {
            count: status_breakdown.missing_from_website,
            companies: with_status(Status::Add)
                .take(SAMPLE_LIMIT)
                .map(|r| MissingCompany {
                    cr_name: r.cr_name.clone(),
                    brand_name: r.brand_name.clone(),
                    vrp_sector: r.baseline_sector.clone(),
                })
                .collect(),
        },
        extra_companies: Sampled {
            count: status_breakdown.extra_on_website,
            companies: with_status(Status::Remove)
                .take(SAMPLE_LIMIT)
                .map(|r| UnmatchedCompany {
                    name: r.website_name.clone(),
                    sector: r.website_sector.clone(),
                })
                .collect(),
        },
        name_updates_needed: Sampled {
            count: status_breakdown.name_updates_needed,
            companies: with_status(Status::RequiresNameUpdate)
                .take(SAMPLE_LIMIT)
                .map(matched_company)
                .collect(),
        },
        sector_updates_needed: Sampled {
            count: status_breakdown.sector_updates_needed,
            companies: with_status(Status::RequiresSectorUpdate)
                .take(SAMPLE_LIMIT)
                .map(|r| SectorDrift {
                    cr_name: r.cr_name.clone(),
                    vrp_sector: r.baseline_sector.clone(),
                    website_sector: r.website_sector.clone(),
                })
                .collect(),
        },
    };

    RunSummary {
        run_date: chrono::Utc::now().format(RUN_DATE_FORMAT).to_string(),
        baseline_file: baseline_file.to_string(),
        totals: Totals {
            baseline_companies: baseline_count,
            website_companies: observed_count,
            matched_companies,
            accuracy_rate: percentage(matched_companies, baseline_count),
        },
        status_breakdown,
        confidence_breakdown,
        shared_matches: 0,
        detailed_analysis,
    }
}

fn matched_company(result: &ClassifiedResult) -> MatchedCompany {
    MatchedCompany {
        cr_name: result.cr_name.clone(),
        website_name: result.website_name.clone(),
        match_score: round1(result.match_score),
    }
}

/// `part / whole * 100` rounded to one decimal; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
