//! Collection file loading and dataset selection.
//!
//! A collection file is a JSON object holding the collection fields plus a
//! `"datasets"` array of dataset objects.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::MetadataError;
use crate::fields::{CollectionMetadata, DatasetMetadata};
use crate::filter::Filter;
use crate::metadata::Metadata;

/// Loads one collection file, producing one [`Metadata`] per dataset entry.
///
/// Each result owns its own copy of the collection part.
///
/// # Errors
///
/// Returns [`MetadataError::Io`] if the file cannot be read,
/// [`MetadataError::Json`] if it is not valid JSON, and
/// [`MetadataError::Validation`] if the structure or any field is invalid.
pub fn load_collection(path: &Path) -> Result<Vec<Metadata>, MetadataError> {
    let text = fs::read_to_string(path).map_err(|e| MetadataError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|e| MetadataError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_collection(value)
}

fn parse_collection(value: Value) -> Result<Vec<Metadata>, MetadataError> {
    let Value::Object(mut fields) = value else {
        return Err(MetadataError::Validation {
            count: 1,
            details: "collection file must hold a JSON object".to_string(),
        });
    };

    let datasets = match fields.remove("datasets") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(MetadataError::Validation {
                count: 1,
                details: "'datasets' must be a list".to_string(),
            });
        }
        None => Vec::new(),
    };

    let collection = CollectionMetadata::new(fields)?;
    datasets
        .into_iter()
        .map(|entry| {
            let dataset = DatasetMetadata::from_value(entry)?;
            Ok(Metadata::new(dataset, collection.clone()))
        })
        .collect()
}

/// Every dataset described by a directory of collection files.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    datasets: Vec<Metadata>,
}

impl Catalog {
    /// Builds a catalog from already-loaded metadata.
    pub fn new(datasets: Vec<Metadata>) -> Self {
        Self { datasets }
    }

    /// Loads every `*.json` file in `dir`, in file-name order.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Io`] if the directory cannot be listed, or
    /// the first error from [`load_collection`].
    pub fn from_dir(dir: &Path) -> Result<Self, MetadataError> {
        let io_err = |e: std::io::Error| MetadataError::Io {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        };
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?
            .into_iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut datasets = Vec::new();
        for path in &paths {
            let loaded = load_collection(path)?;
            debug!(path = %path.display(), n = loaded.len(), "loaded collection");
            datasets.extend(loaded);
        }
        info!(n_files = paths.len(), n_datasets = datasets.len(), "catalog loaded");
        Ok(Self { datasets })
    }

    /// Returns the datasets matching `filter`, in catalog order.
    pub fn select(&self, filter: &Filter) -> Vec<&Metadata> {
        self.datasets.iter().filter(|m| m.matches(filter)).collect()
    }

    /// Iterates over every dataset.
    pub fn iter(&self) -> impl Iterator<Item = &Metadata> {
        self.datasets.iter()
    }

    /// Returns the number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
