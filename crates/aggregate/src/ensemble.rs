//! Value and rank summaries across an ensemble of datasets.

use std::collections::BTreeSet;

use tellus_series::AnnualSeries;
use tellus_stats::{mean, pop_sd};
use tracing::debug;

use crate::error::AggregateError;
use crate::name_of;

/// Multiplier turning a standard deviation into a 90% half-width.
const IPCC_SD_FACTOR: f64 = 1.645;

/// Half of the structural uncertainty added to the ensemble spread.
const IPCC_STRUCTURAL_HALF_WIDTH: f64 = 0.24 / 2.0;

/// Central value with a lower and an upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    /// Mean across datasets.
    pub mean: f64,
    /// Lower bound of the spread.
    pub lower: f64,
    /// Upper bound of the spread.
    pub upper: f64,
}

/// Best and worst rank a year takes across datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRange {
    /// Smallest rank number, i.e. the highest placing.
    pub min: usize,
    /// Largest rank number.
    pub max: usize,
}

/// A year that is the highest on record in at least one dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighestYear {
    pub year: i32,
    /// Lowest value any dataset has for `year`.
    pub min: f64,
    /// Highest value any dataset has for `year`.
    pub max: f64,
}

fn values_for_year(series: &[AnnualSeries], year: i32) -> Result<Vec<f64>, AggregateError> {
    if series.is_empty() {
        return Err(AggregateError::Empty);
    }
    let values: Vec<f64> = series
        .iter()
        .filter_map(|s| {
            let value = s.get_value_from_year(year);
            if value.is_none() {
                debug!(dataset = name_of(s), year, "no value, skipped");
            }
            value
        })
        .collect();
    if values.is_empty() {
        return Err(AggregateError::NoData { year });
    }
    Ok(values)
}

/// Rank range of `year` across every dataset that has a value for it.
///
/// Each dataset is ranked on its own, 1 = highest unless `ascending`.
///
/// # Errors
///
/// [`AggregateError::NoData`] if no dataset has a value for `year`.
#[tracing::instrument(skip(series), fields(n_series = series.len()))]
pub fn calculate_ranks(
    series: &[AnnualSeries],
    year: i32,
    ascending: bool,
) -> Result<RankRange, AggregateError> {
    if series.is_empty() {
        return Err(AggregateError::Empty);
    }
    let ranks: Vec<usize> = series
        .iter()
        .filter_map(|s| s.get_rank_from_year_ordered(year, ascending))
        .collect();
    match (ranks.iter().min(), ranks.iter().max()) {
        (Some(&min), Some(&max)) => Ok(RankRange { min, max }),
        _ => Err(AggregateError::NoData { year }),
    }
}

/// Mean, minimum and maximum of the values datasets hold for `year`.
///
/// # Errors
///
/// [`AggregateError::NoData`] if no dataset has a value for `year`.
#[tracing::instrument(skip(series), fields(n_series = series.len()))]
pub fn calculate_values(series: &[AnnualSeries], year: i32) -> Result<Spread, AggregateError> {
    let values = values_for_year(series, year)?;
    Ok(Spread {
        mean: mean(&values),
        lower: values.iter().copied().fold(f64::INFINITY, f64::min),
        upper: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Ensemble mean for `year` bounded by a 90% range.
///
/// The half-width combines `1.645` population standard deviations of the
/// ensemble in quadrature with a fixed structural term of `0.12`.
///
/// # Errors
///
/// [`AggregateError::NoData`] if no dataset has a value for `year`.
#[tracing::instrument(skip(series), fields(n_series = series.len()))]
pub fn calculate_values_ipcc_style(
    series: &[AnnualSeries],
    year: i32,
) -> Result<Spread, AggregateError> {
    let values = values_for_year(series, year)?;
    let centre = mean(&values);
    let spread = (pop_sd(&values) * IPCC_SD_FACTOR).hypot(IPCC_STRUCTURAL_HALF_WIDTH);
    Ok(Spread {
        mean: centre,
        lower: centre - spread,
        upper: centre + spread,
    })
}

/// Every year ranked highest in at least one dataset, in year order, with
/// the range of values all datasets hold for it.
///
/// # Errors
///
/// [`AggregateError::Empty`] for an empty list.
#[tracing::instrument(skip(series), fields(n_series = series.len()))]
pub fn calculate_highest_year_and_values(
    series: &[AnnualSeries],
) -> Result<Vec<HighestYear>, AggregateError> {
    if series.is_empty() {
        return Err(AggregateError::Empty);
    }
    let years: BTreeSet<i32> = series.iter().flat_map(|s| s.get_year_from_rank(1)).collect();

    years
        .into_iter()
        .map(|year| {
            let values = calculate_values(series, year)?;
            Ok(HighestYear {
                year,
                min: values.lower,
                max: values.upper,
            })
        })
        .collect()
}

/// Earliest first year and latest last year over all datasets.
pub fn superset_year_range(series: &[AnnualSeries]) -> Option<(i32, i32)> {
    series
        .iter()
        .filter_map(AnnualSeries::get_first_and_last_year)
        .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
}
