//! Month validation and English month names.

use crate::error::CalendarError;

/// Full English month names, index 0 = January.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Checks that `month` lies in 1..=12 and returns it unchanged.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] otherwise.
pub fn validate_month(month: u8) -> Result<u8, CalendarError> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(CalendarError::InvalidMonth { month })
    }
}

/// Returns the full English name of `month` (1 = "January").
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
pub fn month_name(month: u8) -> Result<&'static str, CalendarError> {
    let month = validate_month(month)?;
    Ok(MONTH_NAMES[usize::from(month) - 1])
}
