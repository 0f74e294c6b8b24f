//! Reader lookup keyed by format and time resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tellus_metadata::Metadata;
use tellus_series::Series;
use tracing::info;

use crate::badc_reader::{read_annual_badc, read_monthly_badc};
use crate::csv_reader::{read_annual_csv, read_monthly_csv};
use crate::error::IoError;
use crate::kind::{FormatKind, Resolution};

/// Signature shared by every reader: data file plus the dataset's metadata.
pub type ReaderFn = fn(&Path, Metadata) -> Result<Series, IoError>;

/// Explicit table of readers. Lookups for unregistered combinations fail
/// with [`IoError::Unsupported`].
#[derive(Clone, Default)]
pub struct ReaderRegistry {
    readers: BTreeMap<(FormatKind, Resolution), ReaderFn>,
}

impl fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.readers.keys()).finish()
    }
}

impl ReaderRegistry {
    /// Creates a registry with no readers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the CSV and BADC-CSV readers for both
    /// resolutions.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(FormatKind::Csv, Resolution::Monthly, read_monthly_csv);
        registry.register(FormatKind::Csv, Resolution::Annual, read_annual_csv);
        registry.register(FormatKind::Badc, Resolution::Monthly, read_monthly_badc);
        registry.register(FormatKind::Badc, Resolution::Annual, read_annual_badc);
        registry
    }

    /// Registers `reader`, returning the reader it replaces.
    pub fn register(
        &mut self,
        kind: FormatKind,
        resolution: Resolution,
        reader: ReaderFn,
    ) -> Option<ReaderFn> {
        self.readers.insert((kind, resolution), reader)
    }

    /// True if a reader is registered for `(kind, resolution)`.
    pub fn supports(&self, kind: FormatKind, resolution: Resolution) -> bool {
        self.readers.contains_key(&(kind, resolution))
    }

    /// Reads `path` with the reader registered for `(kind, resolution)`.
    ///
    /// # Errors
    ///
    /// [`IoError::Unsupported`] if no reader is registered, otherwise
    /// whatever the reader returns.
    pub fn read(
        &self,
        kind: FormatKind,
        resolution: Resolution,
        path: &Path,
        metadata: Metadata,
    ) -> Result<Series, IoError> {
        let reader = self
            .readers
            .get(&(kind, resolution))
            .ok_or(IoError::Unsupported { kind, resolution })?;
        reader(path, metadata)
    }

    /// Reads a dataset described by its metadata: `reader` picks the
    /// format, `time_resolution` the resolution and `filename` the file
    /// under `data_dir`.
    ///
    /// `filename` may be a string or a list holding a single entry.
    ///
    /// # Errors
    ///
    /// [`IoError::FileCount`] if `filename` is a list of any other length,
    /// otherwise as [`ReaderRegistry::read`].
    pub fn read_dataset(&self, data_dir: &Path, metadata: &Metadata) -> Result<Series, IoError> {
        let kind = FormatKind::of(metadata)?;
        let resolution = Resolution::of(metadata)?;
        let dataset = metadata.get_str("name").unwrap_or("<unnamed>");
        let filenames = metadata.get_str_list("filename")?;
        let [filename] = filenames.as_slice() else {
            return Err(IoError::FileCount {
                dataset: dataset.to_string(),
                count: filenames.len(),
            });
        };
        let path = data_dir.join(filename);
        info!(
            dataset,
            %kind,
            %resolution,
            path = %path.display(),
            "reading dataset"
        );
        self.read(kind, resolution, &path, metadata.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refuse(_: &Path, _: Metadata) -> Result<Series, IoError> {
        Err(IoError::Read {
            path: "refused".into(),
            reason: "test reader".to_string(),
        })
    }

    #[test]
    fn builtin_covers_every_combination() {
        let registry = ReaderRegistry::with_builtin();
        for kind in [FormatKind::Csv, FormatKind::Badc] {
            for resolution in [Resolution::Monthly, Resolution::Annual] {
                assert!(registry.supports(kind, resolution));
            }
        }
    }

    #[test]
    fn empty_registry_fails_closed() {
        let registry = ReaderRegistry::new();
        assert!(!registry.supports(FormatKind::Csv, Resolution::Annual));
    }

    #[test]
    fn register_replaces() {
        let mut registry = ReaderRegistry::with_builtin();
        let previous = registry.register(FormatKind::Csv, Resolution::Annual, refuse);
        assert!(previous.is_some());
        assert!(registry.register(FormatKind::Csv, Resolution::Annual, refuse).is_some());
        assert_eq!(format!("{registry:?}").matches("Csv").count(), 2);
    }
}
