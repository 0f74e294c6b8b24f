//! Combined dataset + collection metadata view.

use serde_json::Value;
use tracing::trace;

use crate::error::MetadataError;
use crate::fields::{CollectionMetadata, DatasetMetadata};
use crate::filter::{Filter, term_matches};

/// Metadata owned by a single series.
///
/// Lookups resolve the dataset part first, then the collection part.
/// Cloning produces an independent deep copy, so a derived series never
/// shares mutable state with its ancestor.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    dataset: DatasetMetadata,
    collection: CollectionMetadata,
}

impl Metadata {
    /// Combines a dataset part with its collection part.
    pub fn new(dataset: DatasetMetadata, collection: CollectionMetadata) -> Self {
        Self {
            dataset,
            collection,
        }
    }

    /// Returns the dataset part.
    pub fn dataset(&self) -> &DatasetMetadata {
        &self.dataset
    }

    /// Returns the collection part.
    pub fn collection(&self) -> &CollectionMetadata {
        &self.collection
    }

    /// Looks up `key`, dataset part first.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::KeyNotFound`] if neither part defines it.
    pub fn get(&self, key: &str) -> Result<&Value, MetadataError> {
        self.dataset
            .get(key)
            .or_else(|| self.collection.get(key))
            .ok_or_else(|| MetadataError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Replaces the value of `key` in whichever part already defines it.
    ///
    /// Keys are never created implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::KeyNotFound`] if neither part defines it, or
    /// [`MetadataError::Validation`] if the value has the wrong type.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), MetadataError> {
        let value = value.into();
        trace!(key, %value, "set metadata");
        if self.dataset.contains(key) {
            self.dataset.set(key, value)
        } else if self.collection.contains(key) {
            self.collection.set(key, value)
        } else {
            Err(MetadataError::KeyNotFound {
                key: key.to_string(),
            })
        }
    }

    /// Returns `true` if either part defines `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.dataset.contains(key) || self.collection.contains(key)
    }

    /// Tests this record against `filter`.
    ///
    /// Every term is checked. Keys this record does not define are ignored;
    /// keys it does define must equal the wanted value, or one element of
    /// it when the wanted value is a list.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter
            .terms()
            .map(|(key, wanted)| match self.get(key) {
                Ok(actual) => term_matches(actual, wanted),
                Err(_) => true,
            })
            .fold(true, |all, ok| all && ok)
    }

    /// Returns `key` as a string slice.
    pub fn get_str(&self, key: &str) -> Result<&str, MetadataError> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| wrong_type(key, "a string"))
    }

    /// Returns `key` as an integer, or `None` when it holds `null`.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, MetadataError> {
        match self.get(key)? {
            Value::Null => Ok(None),
            value => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| wrong_type(key, "an integer")),
        }
    }

    /// Returns `key` as a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool, MetadataError> {
        self.get(key)?
            .as_bool()
            .ok_or_else(|| wrong_type(key, "a boolean"))
    }

    /// Returns `key` as a list of strings. A single string is a one-element list.
    pub fn get_str_list(&self, key: &str) -> Result<Vec<String>, MetadataError> {
        match self.get(key)? {
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| wrong_type(key, "a list of strings"))
                })
                .collect(),
            _ => Err(wrong_type(key, "a list of strings")),
        }
    }

    /// Returns the provenance log in recorded order.
    pub fn history(&self) -> Result<Vec<String>, MetadataError> {
        self.get_str_list("history")
    }

    /// Appends one entry to the provenance log.
    pub fn push_history(&mut self, entry: impl Into<String>) -> Result<(), MetadataError> {
        let mut history = self.history()?;
        history.push(entry.into());
        self.set("history", history)
    }

    /// Returns the climatology period, if one is recorded.
    pub fn climatology(&self) -> Result<Option<(i64, i64)>, MetadataError> {
        let start = self.get_i64("climatology_start")?;
        let end = self.get_i64("climatology_end")?;
        Ok(start.zip(end))
    }

    /// Records the climatology period `[start, end]`.
    pub fn set_climatology(&mut self, start: i32, end: i32) -> Result<(), MetadataError> {
        self.set("climatology_start", start)?;
        self.set("climatology_end", end)
    }
}

fn wrong_type(key: &str, expected: &'static str) -> MetadataError {
    MetadataError::WrongType {
        key: key.to_string(),
        expected,
    }
}
