//! # tellus-calendar
//!
//! Calendar helpers shared by the time-series crates: month validation,
//! month names, and the "days since 1800-01-01" time axis written into
//! BADC-CSV output files.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tellus_calendar::{days_since_1800, month_name, validate_month};
//!
//! assert_eq!(month_name(3).unwrap(), "March");
//! assert_eq!(validate_month(12).unwrap(), 12);
//! assert_eq!(days_since_1800(1800, 1, 1).unwrap(), 0);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `month` | Month validation and names |
//! | `epoch` | Day offsets from the 1800-01-01 reference date |
//! | `error` | Error types |

mod epoch;
mod error;
mod month;

pub use epoch::{EPOCH_LABEL, annual_time, days_in_month, days_since_1800, monthly_time};
pub use error::CalendarError;
pub use month::{MONTH_NAMES, month_name, validate_month};
