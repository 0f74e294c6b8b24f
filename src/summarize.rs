//! Summarize command: process selected datasets and write outputs.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tellus_aggregate::{
    AggregateError, Spread, calculate_highest_year_and_values, calculate_trends,
    calculate_values, calculate_values_ipcc_style, describe_rank, superset_year_range,
};
use tellus_io::ReaderRegistry;
use tellus_metadata::{Catalog, Metadata};
use tellus_series::{AnnualSeries, BadcConfig};
use tracing::{info, info_span, warn};

use crate::cli::SummarizeArgs;
use crate::config::{ProcessingToml, TellusConfig};
use crate::convert;

/// Contents of `summary.json`.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub year: i32,
    pub baseline: [i32; 2],
    pub datasets: Vec<String>,
    pub date_range: Option<[i32; 2]>,
    /// "the highest on record", "between the 2nd and 3rd highest on record", ...
    pub rank: String,
    pub values: Option<ValueSummary>,
    pub ipcc_values: Option<ValueSummary>,
    pub trend: Option<TrendSummary>,
    pub highest_years: Vec<HighestYearEntry>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ValueSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TrendSummary {
    pub start: i32,
    pub end: i32,
    /// Units per decade.
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct HighestYearEntry {
    pub year: i32,
    pub min: f64,
    pub max: f64,
}

impl From<Spread> for ValueSummary {
    fn from(s: Spread) -> Self {
        Self {
            mean: s.mean,
            min: s.lower,
            max: s.upper,
        }
    }
}

/// Logs an aggregate that could not be computed and drops it from the summary.
fn optional<T>(what: &str, result: Result<T, AggregateError>) -> Option<T> {
    result
        .inspect_err(|e| warn!(error = %e, "{what} left out of summary"))
        .ok()
}

/// Reads, rebaselines and optionally smooths one dataset.
fn prepare(
    registry: &ReaderRegistry,
    data_dir: &Path,
    metadata: &Metadata,
    processing: &ProcessingToml,
) -> Result<AnnualSeries> {
    let series = registry.read_dataset(data_dir, metadata)?;
    let mut annual = series.into_annual()?;
    annual.rebaseline(processing.baseline_start, processing.baseline_end)?;
    match processing.running_mean {
        Some(window) => Ok(annual.running_mean(window)?),
        None => Ok(annual),
    }
}

/// Builds the summary of `series` for `year`.
pub fn summarise(
    series: &[AnnualSeries],
    year: i32,
    processing: &ProcessingToml,
) -> Result<Summary> {
    let date_range = superset_year_range(series);
    let (trend_start, trend_end) = convert::trend_period(processing, year, date_range)?;

    let trend = optional(
        "trend",
        calculate_trends(series, trend_start, trend_end),
    )
    .map(|s| TrendSummary {
        start: trend_start,
        end: trend_end,
        mean: s.mean,
        min: s.lower,
        max: s.upper,
    });
    let highest_years = optional("highest years", calculate_highest_year_and_values(series))
        .unwrap_or_default()
        .into_iter()
        .map(|h| HighestYearEntry {
            year: h.year,
            min: h.min,
            max: h.max,
        })
        .collect();

    Ok(Summary {
        year,
        baseline: [processing.baseline_start, processing.baseline_end],
        datasets: series
            .iter()
            .map(|s| s.metadata().get_str("name").map(str::to_string))
            .collect::<Result<_, _>>()?,
        date_range: date_range.map(|(first, last)| [first, last]),
        rank: describe_rank(series, year),
        values: optional("values", calculate_values(series, year)).map(Into::into),
        ipcc_values: optional("ipcc values", calculate_values_ipcc_style(series, year))
            .map(Into::into),
        trend,
        highest_years,
    })
}

/// Run the summary pipeline.
pub fn run(args: SummarizeArgs) -> Result<()> {
    let _cmd = info_span!("summarize").entered();
    // 1. Load project TOML
    let config = TellusConfig::load(&args.config)?;
    let Some(year) = args.year.or(config.processing.year) else {
        bail!("no report year: set [processing].year in config or use --year");
    };
    let output_dir = args.output.unwrap_or(config.paths.output_dir);
    let badc_config: BadcConfig = convert::build_badc_config(&config.badc)?;

    // 2. Select datasets
    let metadata_dir = &config.paths.metadata_dir;
    let catalog = Catalog::from_dir(metadata_dir)
        .with_context(|| format!("failed to load metadata from {}", metadata_dir.display()))?;
    let selected: Vec<&Metadata> = catalog
        .select(&config.selection)
        .into_iter()
        .filter(|m| m.get_str("type").is_ok_and(|t| t == "timeseries"))
        .collect();
    info!(n_selected = selected.len(), "datasets selected");
    // Output files and summary entries are keyed by dataset name
    let mut seen = HashSet::new();
    for metadata in &selected {
        let name = metadata.get_str("name")?;
        if !seen.insert(name) {
            bail!("dataset name '{name}' is selected more than once");
        }
    }

    // 3. Read and process each dataset; one bad dataset does not stop the rest
    let registry = ReaderRegistry::with_builtin();
    let mut series = Vec::with_capacity(selected.len());
    for metadata in selected {
        let name = metadata.get_str("name")?;
        match prepare(&registry, &config.paths.data_dir, metadata, &config.processing) {
            Ok(annual) => series.push(annual),
            Err(e) => warn!(dataset = name, error = %format!("{e:#}"), "dataset skipped"),
        }
    }
    if series.is_empty() {
        bail!("no dataset could be processed");
    }

    // 4. Write one BADC-CSV per dataset
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    for annual in &series {
        let name = annual.metadata().get_str("name")?;
        let path = output_dir.join(format!("{name}.csv"));
        annual
            .write_badc(&path, &badc_config)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "BADC-CSV written");
    }

    // 5. Summary JSON
    let summary = summarise(&series, year, &config.processing)?;
    let json = serde_json::to_string_pretty(&summary).context("failed to serialise summary")?;
    let summary_path = output_dir.join("summary.json");
    fs::write(&summary_path, json)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    info!(path = %summary_path.display(), "summary written");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Writes a collection file with two annual CSV datasets plus one
    /// dataset whose file is missing, and a config pointing at them.
    fn project(dir: &Path) -> PathBuf {
        let meta_dir = dir.join("metadata");
        let data_dir = dir.join("data");
        fs::create_dir_all(&meta_dir).unwrap();
        fs::create_dir_all(&data_dir).unwrap();

        let collection = serde_json::json!({
            "name": "gmt",
            "display_name": "Global mean temperature",
            "variable": "tas",
            "units": "degC",
            "datasets": [
                {"name": "alpha", "type": "timeseries", "time_resolution": "annual",
                 "reader": "csv", "filename": "alpha.csv"},
                {"name": "beta", "type": "timeseries", "time_resolution": "annual",
                 "reader": "csv", "filename": "beta.csv"},
                {"name": "gamma", "type": "timeseries", "time_resolution": "annual",
                 "reader": "csv", "filename": "missing.csv"},
                {"name": "delta", "type": "gridded", "time_resolution": "monthly",
                 "reader": "csv", "filename": "delta.nc"},
            ]
        });
        fs::write(meta_dir.join("gmt.json"), collection.to_string()).unwrap();

        let mut alpha = String::from("year,value\n");
        let mut beta = String::from("year,value\n");
        for year in 1971..=2020 {
            let t = f64::from(year - 1971);
            alpha.push_str(&format!("{year},{}\n", 0.02 * t));
            beta.push_str(&format!("{year},{}\n", 0.01 * t));
        }
        fs::write(data_dir.join("alpha.csv"), alpha).unwrap();
        fs::write(data_dir.join("beta.csv"), beta).unwrap();

        let config = format!(
            "[paths]\nmetadata_dir = {:?}\ndata_dir = {:?}\noutput_dir = {:?}\n\n\
             [processing]\nbaseline_start = 1981\nbaseline_end = 2010\n\n\
             [badc]\nrevised = \"2024-01-12\"\n",
            meta_dir.display().to_string(),
            data_dir.display().to_string(),
            dir.join("out").display().to_string(),
        );
        let path = dir.join("tellus.toml");
        fs::write(&path, config).unwrap();
        path
    }

    #[test]
    fn summarize_writes_badc_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let config = project(dir.path());
        run(SummarizeArgs {
            config,
            year: Some(2020),
            output: None,
        })
        .unwrap();

        let out = dir.path().join("out");
        assert!(out.join("alpha.csv").exists());
        assert!(out.join("beta.csv").exists());
        assert!(!out.join("gamma.csv").exists());
        assert!(!out.join("delta.csv").exists());

        let badc = fs::read_to_string(out.join("alpha.csv")).unwrap();
        assert!(badc.contains("history,G,Rebaselined to 1981-2010\n"));
        assert!(badc.contains("last_revised_date,G,2024-01-12\n"));

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["year"], 2020);
        assert_eq!(summary["datasets"], serde_json::json!(["alpha", "beta"]));
        assert_eq!(summary["rank"], "the highest on record");
        assert_eq!(summary["date_range"], serde_json::json!([1971, 2020]));
        let trend = &summary["trend"];
        assert!((trend["min"].as_f64().unwrap() - 0.1).abs() < 1e-9);
        assert!((trend["max"].as_f64().unwrap() - 0.2).abs() < 1e-9);
        assert_eq!(summary["highest_years"][0]["year"], 2020);
    }

    #[test]
    fn summarize_rejects_duplicate_dataset_names() {
        let dir = tempfile::tempdir().unwrap();
        let config = project(dir.path());
        let second = serde_json::json!({
            "name": "gmt_extra",
            "display_name": "Global mean temperature (extra)",
            "variable": "tas",
            "units": "degC",
            "datasets": [
                {"name": "alpha", "type": "timeseries", "time_resolution": "annual",
                 "reader": "csv", "filename": "beta.csv"},
            ]
        });
        fs::write(dir.path().join("metadata").join("gmt_extra.json"), second.to_string()).unwrap();

        let err = run(SummarizeArgs {
            config,
            year: Some(2020),
            output: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("dataset name 'alpha' is selected more than once"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn summarize_requires_a_year() {
        let dir = tempfile::tempdir().unwrap();
        let config = project(dir.path());
        let err = run(SummarizeArgs {
            config,
            year: None,
            output: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("no report year"));
    }

    #[test]
    fn summary_degrades_without_data_for_year() {
        let dir = tempfile::tempdir().unwrap();
        let config = TellusConfig::load(&project(dir.path())).unwrap();
        let registry = ReaderRegistry::with_builtin();
        let catalog = Catalog::from_dir(&config.paths.metadata_dir).unwrap();
        let series: Vec<AnnualSeries> = catalog
            .iter()
            .filter_map(|m| {
                prepare(&registry, &config.paths.data_dir, m, &config.processing).ok()
            })
            .collect();
        assert_eq!(series.len(), 2);

        let summary = summarise(&series, 2030, &config.processing).unwrap();
        assert_eq!(summary.rank, "no data for 2030");
        assert!(summary.values.is_none());
        assert!(summary.ipcc_values.is_none());
        assert!(summary.trend.is_some());
    }
}
