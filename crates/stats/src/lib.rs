//! Statistical helper functions for the tellus time-series crates.
//!
//! Missing values are represented as `f64::NAN` throughout. Functions state
//! whether they skip or propagate NaN.

use std::cmp::Ordering;

/// Arithmetic mean of a slice. Returns NaN if empty.
///
/// NaN entries propagate.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Mean of the finite entries only. Returns NaN if none are finite.
pub fn nan_mean(data: &[f64]) -> f64 {
    let finite: Vec<f64> = data.iter().copied().filter(|v| !v.is_nan()).collect();
    mean(&finite)
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Population standard deviation (N denominator).
/// Returns 0.0 if empty.
pub fn pop_sd(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let nf = data.len() as f64;
    let mean = data.iter().sum::<f64>() / nf;
    (data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / nf).sqrt()
}

/// Ordinary least-squares slope of `y` against `x`.
///
/// Returns `None` if fewer than 2 pairs, the lengths differ, or `x` has zero
/// variance.
pub fn ols_slope(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        sxy += (xi - mx) * (yi - my);
        sxx += (xi - mx) * (xi - mx);
    }
    if sxx == 0.0 {
        return None;
    }
    Some(sxy / sxx)
}

/// "min" ranking: tied values share the lowest rank of their group.
///
/// With `ascending = false`, rank 1 is the highest value. NaN entries get
/// `None` and do not occupy a rank.
///
/// ```ignore
/// let ranks = rank_min(&[5.0, 5.0, 3.0], false);
/// assert_eq!(ranks, vec![Some(1), Some(1), Some(3)]);
/// ```
pub fn rank_min(values: &[f64], ascending: bool) -> Vec<Option<usize>> {
    let mut order: Vec<usize> = (0..values.len()).filter(|&i| !values[i].is_nan()).collect();
    // Stable sort keeps equal values adjacent in input order.
    order.sort_by(|&a, &b| {
        let ord = values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal);
        if ascending { ord } else { ord.reverse() }
    });

    let mut ranks = vec![None; values.len()];
    let mut run_rank = 0;
    for (pos, &idx) in order.iter().enumerate() {
        if pos == 0 || values[idx] != values[order[pos - 1]] {
            run_rank = pos + 1;
        }
        ranks[idx] = Some(run_rank);
    }
    ranks
}

/// Trailing rolling mean over `window` entries.
///
/// The first `window - 1` outputs are NaN, as is any window containing NaN.
/// A `window` of 0 yields all NaN.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }
    for end in (window - 1)..values.len() {
        out[end] = mean(&values[end + 1 - window..=end]);
    }
    out
}

/// Combines independent uncertainties in quadrature and divides by their
/// count, giving the uncertainty of their mean.
///
/// Returns `None` if the slice is empty or any entry is missing.
pub fn mean_uncertainty(uncertainties: &[Option<f64>]) -> Option<f64> {
    if uncertainties.is_empty() {
        return None;
    }
    let mut sum_sq = 0.0;
    for u in uncertainties {
        let u = (*u)?;
        if u.is_nan() {
            return None;
        }
        sum_sq += u * u;
    }
    Some(sum_sq.sqrt() / uncertainties.len() as f64)
}
