//! Phrases for summary paragraphs.

use tellus_series::AnnualSeries;
use tracing::debug;

use crate::ensemble::calculate_ranks;

/// English ordinal for `n`: `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`, …
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Describes a best-to-worst rank range, e.g. "between the 2nd and 4th highest on record".
pub fn rank_range_text(min: usize, max: usize) -> String {
    match (min, max) {
        (1, 1) => "the highest on record".to_string(),
        (a, b) if a == b => format!("the {} highest on record", ordinal(a)),
        (a, b) => format!("between the {} and {} highest on record", ordinal(a), ordinal(b)),
    }
}

/// Rank phrase for `year` across datasets, or `"no data for {year}"` when
/// no dataset covers it.
pub fn describe_rank(series: &[AnnualSeries], year: i32) -> String {
    match calculate_ranks(series, year, false) {
        Ok(range) => rank_range_text(range.min, range.max),
        Err(err) => {
            debug!(year, %err, "rank unavailable");
            format!("no data for {year}")
        }
    }
}
