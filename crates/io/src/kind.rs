//! Reader keys: file format and time resolution.

use std::fmt;
use std::str::FromStr;

use tellus_metadata::Metadata;

use crate::error::IoError;

/// On-disk format of a dataset, from the metadata `reader` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatKind {
    /// Plain CSV with a `year[,month],value[,uncertainty]` header.
    Csv,
    /// BADC-CSV as written by `tellus-series`.
    Badc,
}

/// Time resolution of a dataset, from the metadata `time_resolution` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resolution {
    Monthly,
    Annual,
}

impl FormatKind {
    /// Reads the format named by `metadata`'s `reader` field.
    pub fn of(metadata: &Metadata) -> Result<Self, IoError> {
        metadata.get_str("reader")?.parse()
    }
}

impl Resolution {
    /// Reads the resolution named by `metadata`'s `time_resolution` field.
    pub fn of(metadata: &Metadata) -> Result<Self, IoError> {
        metadata.get_str("time_resolution")?.parse()
    }
}

impl FromStr for FormatKind {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "badc" | "badc-csv" => Ok(Self::Badc),
            _ => Err(IoError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }
}

impl FromStr for Resolution {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "annual" => Ok(Self::Annual),
            _ => Err(IoError::UnknownResolution {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Badc => "badc",
        })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        })
    }
}
