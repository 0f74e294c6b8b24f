//! Dataset and collection parts of a metadata record.

use serde_json::{Map, Value};

use crate::error::MetadataError;
use crate::schema::{self, COLLECTION_SCHEMA, DATASET_SCHEMA, FieldSpec};

/// Schema-checked key/value storage shared by both metadata parts.
#[derive(Debug, Clone, PartialEq)]
struct Fields {
    values: Map<String, Value>,
    schema: &'static [FieldSpec],
}

impl Fields {
    fn new(
        mut values: Map<String, Value>,
        schema: &'static [FieldSpec],
        part: &str,
    ) -> Result<Self, MetadataError> {
        schema::apply(schema, part, &mut values)?;
        Ok(Self { values, schema })
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), MetadataError> {
        schema::check_value(self.schema, key, &value)?;
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MetadataError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }
}

macro_rules! metadata_part {
    ($name:ident, $schema:expr, $part:literal) => {
        impl $name {
            #[doc = concat!("Validates `values` against the ", $part, " schema.")]
            ///
            /// # Errors
            ///
            /// Returns [`MetadataError::Validation`] listing every missing
            /// required field and every field of the wrong type.
            pub fn new(values: Map<String, Value>) -> Result<Self, MetadataError> {
                Ok(Self(Fields::new(values, $schema, $part)?))
            }

            /// Builds from any JSON value, which must be an object.
            pub fn from_value(value: Value) -> Result<Self, MetadataError> {
                match value {
                    Value::Object(map) => Self::new(map),
                    other => Err(MetadataError::Validation {
                        count: 1,
                        details: format!("{} metadata must be an object, got {other}", $part),
                    }),
                }
            }

            /// Returns the value stored under `key`, if any.
            pub fn get(&self, key: &str) -> Option<&Value> {
                self.0.values.get(key)
            }

            /// Returns `true` if `key` is defined.
            pub fn contains(&self, key: &str) -> bool {
                self.0.values.contains_key(key)
            }

            /// Replaces the value of an existing key.
            ///
            /// # Errors
            ///
            /// [`MetadataError::KeyNotFound`] if the key is not defined, or
            /// [`MetadataError::Validation`] if the value has the wrong type.
            pub fn set(&mut self, key: &str, value: Value) -> Result<(), MetadataError> {
                self.0.set(key, value)
            }

            /// Iterates over all keys in sorted order.
            pub fn keys(&self) -> impl Iterator<Item = &str> {
                self.0.values.keys().map(String::as_str)
            }
        }
    };
}

/// Instance-specific metadata: files, reader, baseline and history.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMetadata(Fields);

/// Provider-wide metadata: display name, variable, units and citations.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionMetadata(Fields);

metadata_part!(DatasetMetadata, DATASET_SCHEMA, "dataset");
metadata_part!(CollectionMetadata, COLLECTION_SCHEMA, "collection");
