//! # tellus-aggregate
//!
//! Statistics over a list of annual series, typically one per dataset of
//! the same indicator. A dataset lacking data for a year or period is left
//! out of the aggregate; an error is returned only when no dataset
//! qualifies.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tellus_aggregate::{calculate_trends, calculate_values, describe_rank};
//!
//! let values = calculate_values(&datasets, 2023)?;
//! let trends = calculate_trends(&datasets, 1993, 2023)?;
//! println!("2023 was {}", describe_rank(&datasets, 2023));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `ensemble` | Values, ranks and highest years across datasets |
//! | `trends` | Per-decade least squares trends |
//! | `narrative` | Ordinals and rank phrases |
//! | `error` | Error types |

mod ensemble;
mod error;
mod narrative;
mod trends;

pub use ensemble::{
    HighestYear, RankRange, Spread, calculate_highest_year_and_values, calculate_ranks,
    calculate_values, calculate_values_ipcc_style, superset_year_range,
};
pub use error::AggregateError;
pub use narrative::{describe_rank, ordinal, rank_range_text};
pub use trends::{MIN_TREND_POINTS, calculate_trends, decadal_trend};

use tellus_series::AnnualSeries;

/// Dataset name for log fields.
pub(crate) fn name_of(series: &AnnualSeries) -> &str {
    series.metadata().get_str("name").unwrap_or("<unnamed>")
}
