//! # tellus-metadata
//!
//! Metadata attached to every climate indicator series. A [`Metadata`] value
//! combines instance-specific [`DatasetMetadata`] (files, reader, baseline,
//! provenance history) with provider-wide [`CollectionMetadata`] (display
//! name, variable, units, citations). Lookups check the dataset part first,
//! then the collection part.
//!
//! ```mermaid
//! graph LR
//!     A["collection JSON"] -->|"load_collection()"| B["Vec of Metadata"]
//!     C["directory of JSON"] -->|"Catalog::from_dir()"| D["Catalog"]
//!     D -->|".select(&Filter)"| B
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `schema` | Declarative field tables and validation |
//! | `fields` | Dataset and collection parts |
//! | `metadata` | Combined view, typed accessors, filter matching |
//! | `filter` | Best-effort metadata filter |
//! | `catalog` | Collection file loading and dataset selection |
//! | `error` | Error types |

mod catalog;
mod error;
mod fields;
mod filter;
mod metadata;
mod schema;

pub use catalog::{Catalog, load_collection};
pub use error::MetadataError;
pub use fields::{CollectionMetadata, DatasetMetadata};
pub use filter::Filter;
pub use metadata::Metadata;
pub use schema::{COLLECTION_SCHEMA, DATASET_SCHEMA, FieldDefault, FieldKind, FieldSpec};

pub use serde_json::Value;
