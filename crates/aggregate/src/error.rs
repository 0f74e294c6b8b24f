//! Aggregate error types.

/// Errors raised when an aggregate has nothing to summarise.
///
/// A single series lacking data never produces one of these; it is left out
/// of the aggregate instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// The input list held no series.
    #[error("no series supplied")]
    Empty,

    /// No series has a value for the requested year.
    #[error("no data for {year}")]
    NoData { year: i32 },

    /// No series has enough values in the period to fit a trend.
    #[error("no series has more than {min_points} values in {start}-{end}")]
    InsufficientData {
        start: i32,
        end: i32,
        min_points: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_display() {
        assert_eq!(AggregateError::Empty.to_string(), "no series supplied");
    }

    #[test]
    fn test_no_data_display() {
        let err = AggregateError::NoData { year: 2023 };
        assert_eq!(err.to_string(), "no data for 2023");
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = AggregateError::InsufficientData {
            start: 1993,
            end: 2000,
            min_points: 25,
        };
        let msg = err.to_string();
        assert!(msg.contains("more than 25 values"));
        assert!(msg.contains("1993-2000"));
    }
}
