use std::collections::BTreeMap;

use crate::config::RecommendationThresholds;
use crate::model::{
    CategoryChange, HistoricalComparison, OverallTrend, RunSummary, Status, StatusBreakdown,
    StoredRun, Trend,
};

pub const NO_HISTORY_MESSAGE: &str = "No historical data available for comparison";
pub const HISTORY_DISABLED_MESSAGE: &str = "History tracking disabled for this run";

/// Compare a run's status counts with the previous run's stored rows.
pub fn compare(current: &RunSummary, previous: Option<&StoredRun>) -> HistoricalComparison {
    let Some(previous) = previous else {
        return without_history(NO_HISTORY_MESSAGE);
    };

    let mut previous_counts = StatusBreakdown::default();
    for status in previous.companies.iter().filter_map(|c| c.status) {
        previous_counts.increment(status);
    }

    let changes: BTreeMap<String, CategoryChange> = Status::ALL
        .into_iter()
        .map(|status| {
            let current = current.status_breakdown.get(status);
            let previous = previous_counts.get(status);
            let change = current as i64 - previous as i64;
            let trend = match status {
                Status::Ok => Trend::Same,
                _ if change < 0 => Trend::Improved,
                _ if change > 0 => Trend::Worsened,
                _ => Trend::Same,
            };
            (
                status.category().to_string(),
                CategoryChange {
                    current,
                    previous,
                    change,
                    trend,
                },
            )
        })
        .collect();

    let overall = overall_trend(&changes);
    log::info!("compared against run {}: {overall}", previous.run.id);

    HistoricalComparison {
        has_historical_data: true,
        message: None,
        previous_run_id: Some(previous.run.id),
        changes,
        overall_trend: Some(overall),
    }
}

/// Comparison for a run made without a history store.
pub fn disabled() -> HistoricalComparison {
    without_history(HISTORY_DISABLED_MESSAGE)
}

fn without_history(message: &str) -> HistoricalComparison {
    HistoricalComparison {
        has_historical_data: false,
        message: Some(message.to_string()),
        previous_run_id: None,
        changes: BTreeMap::new(),
        overall_trend: None,
    }
}

fn overall_trend(changes: &BTreeMap<String, CategoryChange>) -> OverallTrend {
    let ok = Status::Ok.category();
    let (mut reduced, mut increased) = (0, 0);
    for (category, change) in changes {
        if category == ok {
            continue;
        }
        if change.change < 0 {
            reduced += 1;
        } else if change.change > 0 {
            increased += 1;
        }
    }

    match reduced.cmp(&increased) {
        std::cmp::Ordering::Greater => OverallTrend::Improving,
        std::cmp::Ordering::Less => OverallTrend::Declining,
        std::cmp::Ordering::Equal => OverallTrend::Stable,
    }
}

/// Advisory strings, most urgent first.
pub fn recommendations(
    summary: &RunSummary,
    history: &HistoricalComparison,
    thresholds: &RecommendationThresholds,
) -> Vec<String> {
    let breakdown = &summary.status_breakdown;
    let mut out = Vec::new();

    if breakdown.missing_from_website > thresholds.missing_high_priority {
        out.push(format!(
            "HIGH PRIORITY: {} companies are missing from the website and need to be added.",
            breakdown.missing_from_website
        ));
    }
    if breakdown.extra_on_website > thresholds.extra_review {
        out.push(format!(
            "REVIEW NEEDED: {} companies appear on the website but not in your baseline. \
             Verify if they should be removed or added to baseline.",
            breakdown.extra_on_website
        ));
    }

    if breakdown.name_updates_needed > 0 {
        out.push(format!(
            "Name standardization needed for {} companies to improve matching accuracy.",
            breakdown.name_updates_needed
        ));
    }
    if breakdown.sector_updates_needed > 0 {
        out.push(format!(
            "Sector alignment needed for {} companies.",
            breakdown.sector_updates_needed
        ));
    }

    let accuracy = summary.totals.accuracy_rate;
    if accuracy < thresholds.accuracy_target {
        out.push(format!(
            "Current accuracy is {accuracy:.1}%. Review companies with low match scores to improve data quality."
        ));
    }

    match history.overall_trend {
        Some(OverallTrend::Declining) => out.push(
            "Data quality appears to be declining compared to previous quarter. \
             Consider implementing stricter data validation processes."
                .to_string(),
        ),
        Some(OverallTrend::Improving) => out.push(
            "Good progress! Data quality is improving compared to previous quarter.".to_string(),
        ),
        _ => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompanyHistoryRow, ComparisonRun, DetailedAnalysis, PerfectMatches, Sampled, Totals};

    fn summary(breakdown: StatusBreakdown, accuracy_rate: f64) -> RunSummary {
        RunSummary {
            run_date: "2026-07-01 09:00:00".into(),
            baseline_file: "q3.csv".into(),
            totals: Totals {
                baseline_companies: 100,
                website_companies: 100,
                matched_companies: 0,
                accuracy_rate,
            },
            status_breakdown: breakdown,
            confidence_breakdown: BTreeMap::new(),
            shared_matches: 0,
            detailed_analysis: DetailedAnalysis {
                perfect_matches: PerfectMatches {
                    count: 0,
                    percentage: 0.0,
                    companies: vec![],
                },
                missing_companies: Sampled { count: 0, companies: vec![] },
                extra_companies: Sampled { count: 0, companies: vec![] },
                name_updates_needed: Sampled { count: 0, companies: vec![] },
                sector_updates_needed: Sampled { count: 0, companies: vec![] },
            },
        }
    }

    fn stored(id: i64, statuses: &[(Status, usize)]) -> StoredRun {
        let companies = statuses
            .iter()
            .flat_map(|&(status, n)| std::iter::repeat(status).take(n))
            .map(|status| CompanyHistoryRow {
                run_id: id,
                cr_name: String::new(),
                brand_name: String::new(),
                website_name: String::new(),
                vrp_sector: String::new(),
                website_sector: String::new(),
                match_score: 0.0,
                status: Some(status),
            })
            .collect();
        StoredRun {
            run: ComparisonRun {
                id,
                run_date: "2026-04-01 09:00:00".into(),
                baseline_file: "q2.csv".into(),
                total_baseline_companies: 0,
                total_website_companies: 0,
                summary_stats: "{}".into(),
                created_at: "2026-04-01 09:00:00".into(),
            },
            companies,
        }
    }

    #[test]
    fn no_previous_run() {
        let cmp = compare(&summary(StatusBreakdown::default(), 100.0), None);
        assert!(!cmp.has_historical_data);
        assert_eq!(cmp.message.as_deref(), Some(NO_HISTORY_MESSAGE));
        assert!(cmp.changes.is_empty());
        assert!(cmp.overall_trend.is_none());
    }

    #[test]
    fn fewer_missing_is_improved() {
        let current = summary(
            StatusBreakdown {
                missing_from_website: 3,
                ..Default::default()
            },
            97.0,
        );
        let previous = stored(4, &[(Status::Add, 5)]);

        let cmp = compare(&current, Some(&previous));
        assert!(cmp.has_historical_data);
        assert_eq!(cmp.previous_run_id, Some(4));
        let missing = cmp.changes["missing_from_website"];
        assert_eq!(missing.current, 3);
        assert_eq!(missing.previous, 5);
        assert_eq!(missing.change, -2);
        assert_eq!(missing.trend, Trend::Improved);
        assert_eq!(cmp.overall_trend, Some(OverallTrend::Improving));
    }

    #[test]
    fn ok_trend_is_always_same() {
        let current = summary(
            StatusBreakdown {
                ok: 10,
                ..Default::default()
            },
            100.0,
        );
        let cmp = compare(&current, Some(&stored(1, &[(Status::Ok, 4)])));
        let ok = cmp.changes["ok"];
        assert_eq!(ok.change, 6);
        assert_eq!(ok.trend, Trend::Same);
        assert_eq!(cmp.overall_trend, Some(OverallTrend::Stable));
    }

    #[test]
    fn more_issues_up_than_down_is_declining() {
        let current = summary(
            StatusBreakdown {
                extra_on_website: 4,
                name_updates_needed: 2,
                sector_updates_needed: 0,
                ..Default::default()
            },
            90.0,
        );
        let previous = stored(
            2,
            &[
                (Status::Remove, 1),
                (Status::RequiresNameUpdate, 1),
                (Status::RequiresSectorUpdate, 1),
            ],
        );
        let cmp = compare(&current, Some(&previous));
        assert_eq!(cmp.changes["extra_on_website"].trend, Trend::Worsened);
        assert_eq!(cmp.changes["sector_updates_needed"].trend, Trend::Improved);
        assert_eq!(cmp.changes.len(), 5);
        assert_eq!(cmp.overall_trend, Some(OverallTrend::Declining));
    }

    #[test]
    fn unknown_stored_status_is_ignored() {
        let mut previous = stored(3, &[(Status::Add, 2)]);
        previous.companies[0].status = None;
        let cmp = compare(&summary(StatusBreakdown::default(), 100.0), Some(&previous));
        assert_eq!(cmp.changes["missing_from_website"].previous, 1);
    }

    #[test]
    fn recommendations_follow_thresholds() {
        let current = summary(
            StatusBreakdown {
                missing_from_website: 11,
                extra_on_website: 6,
                name_updates_needed: 2,
                sector_updates_needed: 1,
                ok: 80,
            },
            80.0,
        );
        let history = HistoricalComparison {
            overall_trend: Some(OverallTrend::Declining),
            ..disabled()
        };

        let recs = recommendations(&current, &history, &RecommendationThresholds::default());
        assert_eq!(recs.len(), 6);
        assert!(recs[0].starts_with("HIGH PRIORITY: 11 companies"));
        assert!(recs[1].starts_with("REVIEW NEEDED: 6 companies"));
        assert!(recs[2].contains("Name standardization needed for 2 companies"));
        assert_eq!(recs[3], "Sector alignment needed for 1 companies.");
        assert!(recs[4].starts_with("Current accuracy is 80.0%."));
        assert!(recs[5].contains("declining"));
    }

    #[test]
    fn thresholds_are_exclusive() {
        let current = summary(
            StatusBreakdown {
                missing_from_website: 10,
                extra_on_website: 5,
                ..Default::default()
            },
            95.0,
        );
        let recs = recommendations(&current, &disabled(), &RecommendationThresholds::default());
        assert!(recs.is_empty(), "{recs:?}");

        let strict = RecommendationThresholds {
            missing_high_priority: 9,
            extra_review: 4,
            accuracy_target: 99.0,
        };
        assert_eq!(recommendations(&current, &disabled(), &strict).len(), 3);
    }

    #[test]
    fn improving_trend_advisory() {
        let history = HistoricalComparison {
            overall_trend: Some(OverallTrend::Improving),
            ..disabled()
        };
        let recs = recommendations(
            &summary(StatusBreakdown::default(), 100.0),
            &history,
            &RecommendationThresholds::default(),
        );
        assert_eq!(
            recs,
            vec!["Good progress! Data quality is improving compared to previous quarter."]
        );
    }
}
