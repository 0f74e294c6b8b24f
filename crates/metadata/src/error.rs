//! Error types for tellus-metadata.

use std::path::PathBuf;

/// Error type for all fallible operations in the tellus-metadata crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetadataError {
    /// One or more schema checks failed while constructing metadata.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Failures joined with `"; "`.
        details: String,
    },

    /// The key is defined in neither the dataset nor the collection part.
    #[error("metadata key '{key}' not found")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// The key exists but its value does not have the requested type.
    #[error("metadata key '{key}' is not {expected}")]
    WrongType {
        /// The offending key.
        key: String,
        /// Human-readable name of the expected type.
        expected: &'static str,
    },

    /// A metadata file could not be parsed as JSON.
    #[error("json error in {}: {reason}", path.display())]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A metadata file or directory could not be read.
    #[error("cannot read {}: {reason}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O message.
        reason: String,
    },
}
