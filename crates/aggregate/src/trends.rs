//! Linear trends across an ensemble of datasets.

use tellus_series::AnnualSeries;
use tellus_stats::{mean, ols_slope};
use tracing::{debug, warn};

use crate::ensemble::Spread;
use crate::error::AggregateError;
use crate::name_of;

/// A dataset needs more than this many values in the period to get a trend.
pub const MIN_TREND_POINTS: usize = 25;

/// Ordinary least squares trend of `series` over `[start, end]`, per decade.
///
/// Returns `None` when the period holds `MIN_TREND_POINTS` values or fewer.
pub fn decadal_trend(series: &AnnualSeries, start: i32, end: i32) -> Option<f64> {
    let (x, y): (Vec<f64>, Vec<f64>) = series
        .records()
        .iter()
        .filter(|r| (start..=end).contains(&r.year) && !r.value.is_nan())
        .map(|r| (f64::from(r.year), r.value))
        .unzip();
    if x.len() <= MIN_TREND_POINTS {
        warn!(
            dataset = name_of(series),
            n = x.len(),
            start,
            end,
            "too few values for a trend, dataset excluded"
        );
        return None;
    }
    ols_slope(&x, &y).map(|slope| slope * 10.0)
}

/// Mean, minimum and maximum decadal trend over `[start, end]`.
///
/// Datasets with too few values in the period are left out.
///
/// # Errors
///
/// [`AggregateError::InsufficientData`] if no dataset qualifies.
#[tracing::instrument(skip(series), fields(n_series = series.len()))]
pub fn calculate_trends(
    series: &[AnnualSeries],
    start: i32,
    end: i32,
) -> Result<Spread, AggregateError> {
    if series.is_empty() {
        return Err(AggregateError::Empty);
    }
    let trends: Vec<f64> = series
        .iter()
        .filter_map(|s| decadal_trend(s, start, end))
        .collect();
    if trends.is_empty() {
        return Err(AggregateError::InsufficientData {
            start,
            end,
            min_points: MIN_TREND_POINTS,
        });
    }
    debug!(n_trends = trends.len(), "calculated trends");
    Ok(Spread {
        mean: mean(&trends),
        lower: trends.iter().copied().fold(f64::INFINITY, f64::min),
        upper: trends.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}
