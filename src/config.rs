use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tellus_metadata::Filter;

/// Top-level Tellus configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TellusConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsToml,

    /// Metadata filter choosing the datasets to process.
    #[serde(default)]
    pub selection: Filter,

    /// Periods and derivations applied to every dataset.
    #[serde(default)]
    pub processing: ProcessingToml,

    /// BADC-CSV preamble overrides.
    #[serde(default)]
    pub badc: BadcToml,
}

impl TellusConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsToml {
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsToml {
    fn default() -> Self {
        Self {
            metadata_dir: default_metadata_dir(),
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_metadata_dir() -> PathBuf {
    PathBuf::from("metadata")
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessingToml {
    #[serde(default = "default_baseline_start")]
    pub baseline_start: i32,
    #[serde(default = "default_baseline_end")]
    pub baseline_end: i32,
    /// Year the summary reports on.
    #[serde(default)]
    pub year: Option<i32>,
    /// First year of the trend period; defaults to the earliest data.
    #[serde(default)]
    pub trend_start: Option<i32>,
    /// Last year of the trend period; defaults to the report year.
    #[serde(default)]
    pub trend_end: Option<i32>,
    /// Window of a trailing running mean applied after rebaselining.
    #[serde(default)]
    pub running_mean: Option<usize>,
}

impl Default for ProcessingToml {
    fn default() -> Self {
        Self {
            baseline_start: default_baseline_start(),
            baseline_end: default_baseline_end(),
            year: None,
            trend_start: None,
            trend_end: None,
            running_mean: None,
        }
    }
}

fn default_baseline_start() -> i32 {
    1981
}
fn default_baseline_end() -> i32 {
    2010
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BadcToml {
    pub creator: Option<String>,
    pub source: Option<String>,
    pub observation_station: Option<String>,
    pub location: Option<String>,
    pub activity: Option<String>,
    pub rights: Option<String>,
    pub comments: Option<String>,
    /// Revision date as `YYYY-MM-DD`; today when unset.
    pub revised: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_file_uses_defaults() {
        let config: TellusConfig = toml::from_str("").unwrap();
        assert_eq!(config.paths.metadata_dir, PathBuf::from("metadata"));
        assert_eq!(config.processing.baseline_start, 1981);
        assert_eq!(config.processing.baseline_end, 2010);
        assert!(config.processing.year.is_none());
        assert!(config.selection.is_empty());
    }

    #[test]
    fn full_file() {
        let text = r#"
            [paths]
            metadata_dir = "meta"
            data_dir = "raw"
            output_dir = "out"

            [selection]
            type = "timeseries"
            variable = ["tas", "sst"]

            [processing]
            baseline_start = 1850
            baseline_end = 1900
            year = 2023
            trend_start = 1993
            running_mean = 20

            [badc]
            source = "WMO State of the Climate"
            revised = "2024-01-12"
        "#;
        let config: TellusConfig = toml::from_str(text).unwrap();
        assert_eq!(config.paths.output_dir, PathBuf::from("out"));
        assert_eq!(
            config.selection,
            Filter::new()
                .with("type", "timeseries")
                .with("variable", json!(["tas", "sst"]))
        );
        assert_eq!(config.processing.year, Some(2023));
        assert_eq!(config.processing.trend_start, Some(1993));
        assert_eq!(config.processing.trend_end, None);
        assert_eq!(config.processing.running_mean, Some(20));
        assert_eq!(config.badc.revised.as_deref(), Some("2024-01-12"));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(toml::from_str::<TellusConfig>("[processing]\nbaseline = 1961\n").is_err());
        assert!(toml::from_str::<TellusConfig>("[output]\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = TellusConfig::load(Path::new("/nonexistent/tellus.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
