//! Day offsets from the 1800-01-01 reference date.
//!
//! Offsets use the proleptic Gregorian calendar. Year zero does not exist on
//! this axis, so years before 1 are rejected.

use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::month::validate_month;

/// Units string written alongside the encoded time column.
pub const EPOCH_LABEL: &str = "days since 1800-01-01 00:00:00.0";

/// Whole days between 1800-01-01 and the given date.
///
/// Dates before the reference give negative offsets.
///
/// # Errors
///
/// Returns [`CalendarError::YearOutOfRange`] for years before 1,
/// [`CalendarError::InvalidMonth`] for a bad month, and
/// [`CalendarError::InvalidDate`] when the day does not exist in that month.
pub fn days_since_1800(year: i32, month: u8, day: u8) -> Result<i64, CalendarError> {
    if year < 1 {
        return Err(CalendarError::YearOutOfRange { year });
    }
    validate_month(month)?;
    let date = NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
        .ok_or(CalendarError::InvalidDate { year, month, day })?;
    let epoch = NaiveDate::from_ymd_opt(1800, 1, 1).ok_or(CalendarError::InvalidDate {
        year: 1800,
        month: 1,
        day: 1,
    })?;
    Ok(date.signed_duration_since(epoch).num_days())
}

/// Number of days in `month` of `year` (Gregorian leap rules).
///
/// # Errors
///
/// Returns [`CalendarError::YearOutOfRange`] for years before 1 and
/// [`CalendarError::InvalidMonth`] for a bad month.
pub fn days_in_month(year: i32, month: u8) -> Result<u8, CalendarError> {
    let start = days_since_1800(year, month, 1)?;
    let next = if month == 12 {
        days_since_1800(year + 1, 1, 1)?
    } else {
        days_since_1800(year, month + 1, 1)?
    };
    Ok((next - start) as u8)
}

/// Time stamp of a monthly record: the first day of its month.
pub fn monthly_time(year: i32, month: u8) -> Result<i64, CalendarError> {
    days_since_1800(year, month, 1)
}

/// Time stamp of an annual record: 1 January of its year.
pub fn annual_time(year: i32) -> Result<i64, CalendarError> {
    days_since_1800(year, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_zero() {
        assert_eq!(days_since_1800(1800, 1, 1).unwrap(), 0);
    }

    #[test]
    fn first_year_has_365_days() {
        // 1800 is not a leap year in the Gregorian calendar.
        assert_eq!(days_since_1800(1801, 1, 1).unwrap(), 365);
    }

    #[test]
    fn before_epoch_is_negative() {
        assert_eq!(days_since_1800(1799, 12, 31).unwrap(), -1);
    }

    #[test]
    fn monthly_and_annual_stamps() {
        assert_eq!(monthly_time(1800, 2).unwrap(), 31);
        assert_eq!(annual_time(1850).unwrap(), monthly_time(1850, 1).unwrap());
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2022, 12).unwrap(), 31);
        assert_eq!(days_in_month(2022, 4).unwrap(), 30);
        assert!(days_in_month(2022, 0).is_err());
    }

    #[test]
    fn rejects_year_zero() {
        assert_eq!(
            days_since_1800(0, 1, 1).unwrap_err(),
            CalendarError::YearOutOfRange { year: 0 }
        );
    }

    #[test]
    fn rejects_missing_leap_day() {
        assert_eq!(
            days_since_1800(1900, 2, 29).unwrap_err(),
            CalendarError::InvalidDate {
                year: 1900,
                month: 2,
                day: 29
            }
        );
    }
}
