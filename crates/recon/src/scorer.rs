//! Name match scoring.
//!
//! A waterfall of strategies from most to least specific; the first one that
//! applies decides score, strategy and confidence:
//!
//! | Strategy          | Score                      | Confidence              |
//! |-------------------|----------------------------|-------------------------|
//! | `ExactNormalized` | 100                        | high                    |
//! | `CoreExact`       | 98                         | high                    |
//! | `AcronymMatch`    | 96                         | high                    |
//! | `Substring`       | 95 / 88                    | high / medium           |
//! | `TokenBased`      | round(ratio * 92)          | high if ratio >= 0.85   |
//! | `Fuzzy`           | best character similarity  | >= 92 high, >= 85 medium|
//!
//! `TooShort` and `LengthMismatch` short-circuit the fuzzy fallback with a
//! score of 0.

use std::collections::BTreeSet;

use rapidfuzz::fuzz;
use serde::Serialize;

use crate::model::{Confidence, MatchOutcome, MatchStrategy};
use crate::normalize::{core_name, normalize};

const ACRONYM_MAX_LEN: usize = 10;
const SUBSTRING_MIN_LEN: usize = 8;
const SUBSTRING_MIN_LENGTH_RATIO: f64 = 0.6;
const SUBSTRING_LONG_NAME: usize = 10;
const TOKEN_MIN_RATIO: f64 = 0.75;
const TOKEN_MIN_COMMON: usize = 2;
const TOKEN_HIGH_RATIO: f64 = 0.85;
const TOKEN_MAX_SCORE: f64 = 92.0;
const FUZZY_MIN_LEN: usize = 3;
const FUZZY_MIN_LENGTH_RATIO: f64 = 0.3;
const FUZZY_HIGH: f64 = 92.0;
const FUZZY_MEDIUM: f64 = 85.0;

/// Words that never count as meaningful overlap between two names.
const GENERIC_WORDS: &[&str] = &[
    "company",
    "group",
    "holding",
    "corp",
    "inc",
    "ltd",
    "limited",
    "co",
    "investment",
];

/// Normalized and core forms of one name, computed once and reused across pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameForms {
    pub normalized: String,
    pub core: String,
}

impl NameForms {
    pub fn of(name: &str) -> Self {
        Self {
            normalized: normalize(name),
            core: core_name(name),
        }
    }
}

/// Score a baseline name against an observed name.
pub fn score(baseline_name: &str, observed_name: &str) -> MatchOutcome {
    score_forms(&NameForms::of(baseline_name), &NameForms::of(observed_name))
}

pub fn score_forms(baseline: &NameForms, observed: &NameForms) -> MatchOutcome {
    let (norm_baseline, norm_observed) = (baseline.normalized.as_str(), observed.normalized.as_str());
    let (core_baseline, core_observed) = (baseline.core.as_str(), observed.core.as_str());

    // Two empty names normalize equal; that must not read as an exact match.
    if !norm_baseline.is_empty() && norm_baseline == norm_observed {
        return MatchOutcome::new(100.0, MatchStrategy::ExactNormalized, Confidence::High);
    }

    if !core_baseline.is_empty() && core_baseline == core_observed {
        return MatchOutcome::new(98.0, MatchStrategy::CoreExact, Confidence::High);
    }

    if let Some(outcome) = acronym_match(core_baseline, core_observed) {
        return outcome;
    }

    if let Some(outcome) = substring_match(core_baseline, core_observed) {
        return outcome;
    }

    if let Some(outcome) = token_match(norm_baseline, norm_observed) {
        return outcome;
    }

    fuzzy_match(norm_baseline, norm_observed)
}

fn acronym_match(core_a: &str, core_b: &str) -> Option<MatchOutcome> {
    if core_a.is_empty() || core_b.is_empty() {
        return None;
    }
    if is_token_of(core_a, core_b) || is_token_of(core_b, core_a) {
        return Some(MatchOutcome::new(96.0, MatchStrategy::AcronymMatch, Confidence::High));
    }
    None
}

/// Whether `short` is a single short token appearing whole in `long`.
fn is_token_of(short: &str, long: &str) -> bool {
    if short.contains(' ') || short.chars().count() > ACRONYM_MAX_LEN {
        return false;
    }
    long.split(' ').any(|token| token.to_lowercase() == short.to_lowercase())
}

fn substring_match(core_a: &str, core_b: &str) -> Option<MatchOutcome> {
    let len_a = core_a.chars().count();
    let len_b = core_b.chars().count();
    if len_a < SUBSTRING_MIN_LEN || len_b < SUBSTRING_MIN_LEN {
        return None;
    }
    if !(core_a.contains(core_b) || core_b.contains(core_a)) {
        return None;
    }

    let shorter = len_a.min(len_b);
    let longer = len_a.max(len_b);
    if (shorter as f64) / (longer as f64) < SUBSTRING_MIN_LENGTH_RATIO {
        return None;
    }

    let (score, confidence) = if longer > SUBSTRING_LONG_NAME {
        (95.0, Confidence::High)
    } else {
        (88.0, Confidence::Medium)
    };
    Some(MatchOutcome::new(score, MatchStrategy::Substring, confidence))
}

fn token_match(norm_a: &str, norm_b: &str) -> Option<MatchOutcome> {
    let meaningful = |s: &str| -> BTreeSet<String> {
        s.split(' ')
            .filter(|t| !t.is_empty() && !GENERIC_WORDS.contains(t))
            .map(str::to_string)
            .collect()
    };
    let tokens_a = meaningful(norm_a);
    let tokens_b = meaningful(norm_b);

    let common = tokens_a.intersection(&tokens_b).count();
    let total = tokens_a.union(&tokens_b).count();
    if common == 0 || total == 0 {
        return None;
    }

    let ratio = common as f64 / total as f64;
    if ratio < TOKEN_MIN_RATIO || common < TOKEN_MIN_COMMON {
        return None;
    }

    let confidence = if ratio >= TOKEN_HIGH_RATIO {
        Confidence::High
    } else {
        Confidence::Medium
    };
    Some(MatchOutcome::new(
        (ratio * TOKEN_MAX_SCORE).round(),
        MatchStrategy::TokenBased,
        confidence,
    ))
}

fn fuzzy_match(norm_a: &str, norm_b: &str) -> MatchOutcome {
    let len_a = norm_a.chars().count();
    let len_b = norm_b.chars().count();

    if len_a < FUZZY_MIN_LEN || len_b < FUZZY_MIN_LEN {
        return MatchOutcome::new(0.0, MatchStrategy::TooShort, Confidence::None);
    }

    let length_ratio = len_a.min(len_b) as f64 / len_a.max(len_b) as f64;
    if length_ratio < FUZZY_MIN_LENGTH_RATIO {
        return MatchOutcome::new(0.0, MatchStrategy::LengthMismatch, Confidence::None);
    }

    let best = ratio(norm_a, norm_b)
        .max(partial_ratio(norm_a, norm_b))
        .max(token_sort_ratio(norm_a, norm_b));

    let confidence = if best >= FUZZY_HIGH {
        Confidence::High
    } else if best >= FUZZY_MEDIUM {
        Confidence::Medium
    } else {
        Confidence::Low
    };
    MatchOutcome::new(best, MatchStrategy::Fuzzy, confidence)
}

// ---------------------------------------------------------------------------
// Character similarity (0..=100)
// ---------------------------------------------------------------------------

/// Indel similarity of the full strings. Two empty strings score 0.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    fuzz::ratio(a.chars(), b.chars()) * 100.0
}

/// Best `ratio` of the shorter string against any window of the longer one,
/// including the partial windows hanging over either end. Strings of equal
/// length are scanned both ways, so the result does not depend on argument
/// order.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() {
        return 0.0;
    }

    let best = window_scan(short, long);
    if short.len() == long.len() && best < 100.0 {
        return best.max(window_scan(long, short));
    }
    best
}

/// Slide `short` across `long` (`short.len() <= long.len()`).
fn window_scan(short: &[char], long: &[char]) -> f64 {
    let m = short.len();
    let n = long.len();
    let window_ratio =
        |window: &[char]| fuzz::ratio(short.iter().copied(), window.iter().copied()) * 100.0;

    let mut best: f64 = 0.0;
    let windows = (1..m)
        .map(|end| &long[..end])
        .chain((0..=n - m).map(|start| &long[start..start + m]))
        .chain((n - m + 1..n).map(|start| &long[start..]));
    for window in windows {
        best = best.max(window_ratio(window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// `ratio` after sorting whitespace-separated tokens of both strings.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let sorted = |s: &str| {
        let mut tokens: Vec<&str> = s.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    };
    ratio(&sorted(a), &sorted(b))
}

// ---------------------------------------------------------------------------
// Explanation
// ---------------------------------------------------------------------------

/// Intermediate forms behind a score, for diagnosing a surprising match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchExplanation {
    pub baseline: String,
    pub website: String,
    pub normalized_baseline: String,
    pub normalized_website: String,
    pub core_baseline: String,
    pub core_website: String,
    pub outcome: MatchOutcome,
}

pub fn explain(baseline_name: &str, observed_name: &str) -> MatchExplanation {
    let baseline = NameForms::of(baseline_name);
    let website = NameForms::of(observed_name);
    let outcome = score_forms(&baseline, &website);
    MatchExplanation {
        baseline: baseline_name.to_string(),
        website: observed_name.to_string(),
        normalized_baseline: baseline.normalized,
        normalized_website: website.normalized,
        core_baseline: baseline.core,
        core_website: website.core,
        outcome,
    }
}
