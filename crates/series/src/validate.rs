//! Accumulated validation of raw series input.

use std::collections::BTreeSet;

use crate::error::SeriesError;

/// Accumulates validation errors and converts them into a single
/// [`SeriesError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Moves every error from `other` into `self`.
    pub(crate) fn merge(&mut self, other: ValidationCollector) {
        self.errors.extend(other.errors);
    }

    pub(crate) fn finish(self) -> Result<(), SeriesError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SeriesError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

/// Checks that every named column has length `expected`.
pub(crate) fn validate_lengths(expected: usize, columns: &[(&str, usize)]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for &(name, len) in columns {
        if len != expected {
            c.push(format!("{name} length {len} != years length {expected}"));
        }
    }
    c
}

/// Checks that every month lies in 1..=12.
pub(crate) fn validate_months(months: &[u8]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for (i, &m) in months.iter().enumerate() {
        if !(1..=12).contains(&m) {
            c.push(format!("invalid month at index {i}: {m}"));
        }
    }
    c
}

/// Checks that no key occurs twice. `label` renders a key for messages.
pub(crate) fn validate_unique<K: Ord + Copy>(
    keys: impl IntoIterator<Item = K>,
    label: impl Fn(K) -> String,
) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    let mut seen = BTreeSet::new();
    for key in keys {
        if !seen.insert(key) {
            c.push(format!("duplicate record for {}", label(key)));
        }
    }
    c
}

/// Checks a `[start, end]` year range.
pub(crate) fn validate_range(start: i32, end: i32) -> Result<(), SeriesError> {
    if start > end {
        return Err(SeriesError::Validation {
            count: 1,
            details: format!("start year {start} is after end year {end}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_report_each_mismatch() {
        let c = validate_lengths(3, &[("months", 2), ("values", 3), ("uncertainty", 4)]);
        let err = c.finish().unwrap_err();
        match err {
            SeriesError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("months length 2"));
                assert!(details.contains("uncertainty length 4"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn months_out_of_range() {
        let err = validate_months(&[1, 0, 13]).finish().unwrap_err();
        assert!(matches!(err, SeriesError::Validation { count: 2, .. }));
    }

    #[test]
    fn duplicates_detected() {
        let err = validate_unique([(2000, 1), (2000, 2), (2000, 1)], |(y, m)| {
            format!("{y}-{m:02}")
        })
        .finish()
        .unwrap_err();
        assert!(err.to_string().contains("duplicate record for 2000-01"));
    }

    #[test]
    fn merge_combines() {
        let mut a = ValidationCollector::new();
        a.push("one");
        let mut b = ValidationCollector::new();
        b.push("two");
        a.merge(b);
        assert!(matches!(
            a.finish(),
            Err(SeriesError::Validation { count: 2, .. })
        ));
    }

    #[test]
    fn range_order() {
        assert!(validate_range(1961, 1990).is_ok());
        assert!(validate_range(1990, 1990).is_ok());
        assert!(validate_range(1991, 1990).is_err());
    }
}
