//! Error types for the tellus-calendar crate.

/// Error type for all fallible operations in the tellus-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a year/month/day triple is not a real calendar date.
    #[error("invalid date: {year}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year of the rejected date.
        year: i32,
        /// Month of the rejected date.
        month: u8,
        /// Day of the rejected date.
        day: u8,
    },

    /// Returned for years before 1; the time axis has no year zero.
    #[error("year {year} is outside the supported range (must be >= 1)")]
    YearOutOfRange {
        /// The rejected year.
        year: i32,
    },
}
