//! # tellus-io
//!
//! Turns dataset files into [`Series`](tellus_series::Series) values. A
//! [`ReaderRegistry`] maps each `(FormatKind, Resolution)` pair, taken from
//! the dataset metadata, to a reader function; there is no fallback for
//! unregistered pairs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tellus_io::ReaderRegistry;
//!
//! let registry = ReaderRegistry::with_builtin();
//! for metadata in catalog.select(&filter) {
//!     let series = registry.read_dataset(data_dir, metadata)?;
//! }
//! ```

mod badc_reader;
mod csv_reader;
mod error;
mod kind;
mod registry;

pub use badc_reader::{read_annual_badc, read_monthly_badc};
pub use csv_reader::{read_annual_csv, read_monthly_csv};
pub use error::IoError;
pub use kind::{FormatKind, Resolution};
pub use registry::{ReaderFn, ReaderRegistry};
