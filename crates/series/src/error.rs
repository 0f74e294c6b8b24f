//! Error types for tellus-series.

use std::path::PathBuf;

/// Error type for all fallible operations in the tellus-series crate.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// One or more input checks failed.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Failures joined with `"; "`.
        details: String,
    },

    /// The requested climatology period holds no usable values.
    #[error("no data in climatology period {start}-{end}{}", month.map(|m| format!(" for month {m}")).unwrap_or_default())]
    EmptyClimatology {
        /// First year of the period.
        start: i32,
        /// Last year of the period.
        end: i32,
        /// Calendar month lacking data, for monthly series.
        month: Option<u8>,
    },

    /// Wraps an error from the tellus-metadata crate.
    #[error("metadata error: {reason}")]
    Metadata {
        /// Description of the underlying metadata failure.
        reason: String,
    },

    /// Wraps an error from the tellus-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// A file could not be written.
    #[error("cannot write {}: {reason}", path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O message.
        reason: String,
    },

    /// A BADC-CSV document is malformed.
    #[error("badc parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// Wraps an error from the csv crate while encoding a document.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying csv failure.
        reason: String,
    },
}

impl From<csv::Error> for SeriesError {
    fn from(e: csv::Error) -> Self {
        SeriesError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<tellus_metadata::MetadataError> for SeriesError {
    fn from(e: tellus_metadata::MetadataError) -> Self {
        SeriesError::Metadata {
            reason: e.to_string(),
        }
    }
}

impl From<tellus_calendar::CalendarError> for SeriesError {
    fn from(e: tellus_calendar::CalendarError) -> Self {
        SeriesError::Calendar {
            reason: e.to_string(),
        }
    }
}
