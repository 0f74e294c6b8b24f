//! Error types for tellus-io.

use std::path::PathBuf;

use tellus_metadata::MetadataError;
use tellus_series::SeriesError;

use crate::kind::{FormatKind, Resolution};

/// Error type for every fallible operation in the tellus-io crate.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a data file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// A file exists but could not be read.
    #[error("failed to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    /// Wraps an error from the csv crate.
    #[error("csv error in {}: {reason}", path.display())]
    Csv { path: PathBuf, reason: String },

    /// A required column is absent from the header row.
    #[error("column '{column}' not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// A cell could not be parsed.
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The metadata names a reader format this crate does not know.
    #[error("unknown reader format '{name}'")]
    UnknownFormat { name: String },

    /// The metadata names a time resolution this crate does not know.
    #[error("unknown time resolution '{name}'")]
    UnknownResolution { name: String },

    /// The metadata lists more or fewer than one data file.
    #[error("dataset '{dataset}' must name exactly one file, found {count}")]
    FileCount { dataset: String, count: usize },

    /// No reader is registered for the requested combination.
    #[error("no reader registered for {kind} {resolution} data")]
    Unsupported {
        kind: FormatKind,
        resolution: Resolution,
    },

    /// Wraps an error from tellus-series.
    #[error("series error: {reason}")]
    Series { reason: String },

    /// Wraps an error from tellus-metadata.
    #[error("metadata error: {reason}")]
    Metadata { reason: String },
}

impl From<SeriesError> for IoError {
    fn from(e: SeriesError) -> Self {
        IoError::Series {
            reason: e.to_string(),
        }
    }
}

impl From<MetadataError> for IoError {
    fn from(e: MetadataError) -> Self {
        IoError::Metadata {
            reason: e.to_string(),
        }
    }
}
