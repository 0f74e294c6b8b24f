//! # tellus-series
//!
//! Monthly and annual climate indicator series and the derivations applied
//! to them. Every derivation appends one entry to the metadata `history`,
//! so a series always carries the ordered list of steps that produced it.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     R["reader output"] --> M["MonthlySeries"]
//!     R --> A["AnnualSeries"]
//!     M -->|".rebaseline()"| M
//!     M -->|".make_annual()"| A
//!     M -->|".make_annual_by_selecting_month()"| A
//!     A -->|".rebaseline() / .add_offset() / .select_decade()"| A
//!     A -->|".running_mean()"| A2["new AnnualSeries"]
//!     M -->|".write_badc()"| F["BADC-CSV"]
//!     A -->|".write_badc()"| F
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use tellus_series::{BadcConfig, MonthlySeries};
//!
//! let mut monthly = MonthlySeries::new(years, months, values, metadata)?;
//! monthly.rebaseline(1981, 2010)?;
//! let annual = monthly.make_annual()?;
//! assert_eq!(annual.get_rank_from_year(2023), Some(1));
//! annual.write_badc(path, &BadcConfig::default())?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `monthly` | Monthly series and its derivations |
//! | `annual` | Annual series, ranking, running means |
//! | `series` | Enum over both kinds |
//! | `badc` | BADC-CSV writer and parser |
//! | `validate` | Input validation |
//! | `error` | Error types |

mod annual;
mod badc;
mod error;
mod monthly;
mod series;
mod validate;

pub use annual::{AnnualRecord, AnnualSeries};
pub use badc::{BadcConfig, BadcTable, parse_badc};
pub use error::SeriesError;
pub use monthly::{MonthlyRecord, MonthlySeries};
pub use series::Series;
