//! Declarative field tables for dataset and collection metadata.
//!
//! Construction validates a JSON object against one of these tables.
//! Required fields must be present; optional fields with a default are
//! filled in when absent. Keys not listed in a table are kept as-is.

use serde_json::{Map, Value};

use crate::error::MetadataError;

/// Value type a field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    Str,
    /// A JSON integer, or `null`.
    OptionalInt,
    /// A JSON boolean.
    Bool,
    /// A JSON array of strings.
    StrList,
    /// A string or an array of strings.
    StrOrList,
    /// Any JSON value.
    Any,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Str => value.is_string(),
            Self::OptionalInt => value.is_null() || value.is_i64(),
            Self::Bool => value.is_boolean(),
            Self::StrList => is_str_list(value),
            Self::StrOrList => value.is_string() || is_str_list(value),
            Self::Any => true,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Str => "a string",
            Self::OptionalInt => "an integer or null",
            Self::Bool => "a boolean",
            Self::StrList => "a list of strings",
            Self::StrOrList => "a string or list of strings",
            Self::Any => "any value",
        }
    }
}

fn is_str_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

/// Value inserted when an optional field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Leave the field absent.
    Absent,
    /// Insert `null`.
    Null,
    /// Insert a boolean.
    Bool(bool),
    /// Insert an empty array.
    EmptyList,
}

impl FieldDefault {
    fn value(self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Null => Some(Value::Null),
            Self::Bool(b) => Some(Value::Bool(b)),
            Self::EmptyList => Some(Value::Array(Vec::new())),
        }
    }
}

/// One row of a schema table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name.
    pub name: &'static str,
    /// Expected value type.
    pub kind: FieldKind,
    /// Whether construction fails when the field is absent.
    pub required: bool,
    /// Default for absent optional fields.
    pub default: FieldDefault,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
        default: FieldDefault::Absent,
    }
}

const fn optional(name: &'static str, kind: FieldKind, default: FieldDefault) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
        default,
    }
}

/// Fields of the instance-specific dataset part.
pub const DATASET_SCHEMA: &[FieldSpec] = &[
    required("name", FieldKind::Str),
    required("type", FieldKind::Str),
    required("time_resolution", FieldKind::Str),
    required("reader", FieldKind::Str),
    required("filename", FieldKind::StrOrList),
    optional("version", FieldKind::Str, FieldDefault::Absent),
    optional("space_resolution", FieldKind::Any, FieldDefault::Absent),
    optional("fetcher", FieldKind::Str, FieldDefault::Absent),
    optional("url", FieldKind::StrOrList, FieldDefault::Absent),
    optional("last_modified", FieldKind::StrOrList, FieldDefault::Absent),
    optional("notes", FieldKind::Str, FieldDefault::Absent),
    optional("climatology_start", FieldKind::OptionalInt, FieldDefault::Null),
    optional("climatology_end", FieldKind::OptionalInt, FieldDefault::Null),
    optional("actual", FieldKind::Bool, FieldDefault::Bool(true)),
    optional("derived", FieldKind::Bool, FieldDefault::Bool(false)),
    optional("history", FieldKind::StrList, FieldDefault::EmptyList),
];

/// Fields of the provider-wide collection part.
pub const COLLECTION_SCHEMA: &[FieldSpec] = &[
    required("name", FieldKind::Str),
    required("display_name", FieldKind::Str),
    required("variable", FieldKind::Str),
    required("units", FieldKind::Str),
    optional("version", FieldKind::Str, FieldDefault::Absent),
    optional("long_name", FieldKind::Str, FieldDefault::Absent),
    optional("citation", FieldKind::StrList, FieldDefault::EmptyList),
    optional("data_citation", FieldKind::StrList, FieldDefault::EmptyList),
    optional("citation_url", FieldKind::StrOrList, FieldDefault::Absent),
    optional("acknowledgement", FieldKind::Str, FieldDefault::Absent),
    optional("colour", FieldKind::Str, FieldDefault::Absent),
    optional("zpos", FieldKind::OptionalInt, FieldDefault::Absent),
    optional("origin", FieldKind::Str, FieldDefault::Absent),
];

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`MetadataError::Validation`].
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

    pub(crate) fn finish(self) -> Result<(), MetadataError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(MetadataError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

/// Validates `fields` against `schema`, filling defaults in place.
pub(crate) fn apply(
    schema: &[FieldSpec],
    part: &str,
    fields: &mut Map<String, Value>,
) -> Result<(), MetadataError> {
    let mut c = ValidationCollector::new();

    for spec in schema {
        match fields.get(spec.name) {
            Some(value) if !spec.kind.accepts(value) => {
                c.push(format!(
                    "{part} field '{}' must be {}",
                    spec.name,
                    spec.kind.describe()
                ));
            }
            Some(_) => {}
            None if spec.required => {
                c.push(format!("{part} field '{}' is required", spec.name));
            }
            None => {
                if let Some(default) = spec.default.value() {
                    fields.insert(spec.name.to_string(), default);
                }
            }
        }
    }

    c.finish()
}

/// Checks a single replacement value against the schema entry for `key`.
pub(crate) fn check_value(
    schema: &[FieldSpec],
    key: &str,
    value: &Value,
) -> Result<(), MetadataError> {
    match schema.iter().find(|spec| spec.name == key) {
        Some(spec) if !spec.kind.accepts(value) => Err(MetadataError::Validation {
            count: 1,
            details: format!("field '{key}' must be {}", spec.kind.describe()),
        }),
        _ => Ok(()),
    }
}
