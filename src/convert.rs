//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tellus_series::BadcConfig;

use crate::config::{BadcToml, ProcessingToml};

/// Builds a [`BadcConfig`] from the TOML `[badc]` section.
pub fn build_badc_config(badc: &BadcToml) -> Result<BadcConfig> {
    let mut cfg = BadcConfig::default();
    if let Some(ref v) = badc.creator {
        cfg = cfg.with_creator(v);
    }
    if let Some(ref v) = badc.source {
        cfg = cfg.with_source(v);
    }
    if let Some(ref v) = badc.observation_station {
        cfg = cfg.with_observation_station(v);
    }
    if let Some(ref v) = badc.location {
        cfg = cfg.with_location(v);
    }
    if let Some(ref v) = badc.activity {
        cfg = cfg.with_activity(v);
    }
    if let Some(ref v) = badc.rights {
        cfg = cfg.with_rights(v);
    }
    if let Some(ref v) = badc.comments {
        cfg = cfg.with_comments(v);
    }
    if let Some(ref v) = badc.revised {
        let date = NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .with_context(|| format!("invalid [badc].revised date: {v:?}"))?;
        cfg = cfg.with_revised(date);
    }
    Ok(cfg)
}

/// Checks the `[processing]` periods and returns `(start, end)` of the trend
/// period, filling unset bounds from `data_range` and `year`.
pub fn trend_period(
    processing: &ProcessingToml,
    year: i32,
    data_range: Option<(i32, i32)>,
) -> Result<(i32, i32)> {
    if processing.baseline_start > processing.baseline_end {
        bail!(
            "baseline_start {} is after baseline_end {}",
            processing.baseline_start,
            processing.baseline_end
        );
    }
    if processing.running_mean == Some(0) {
        bail!("running_mean must be at least 1");
    }
    let start = match (processing.trend_start, data_range) {
        (Some(start), _) => start,
        (None, Some((first, _))) => first,
        (None, None) => year,
    };
    let end = processing.trend_end.unwrap_or(year);
    if start > end {
        bail!("trend period {start}-{end} is empty");
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badc_overrides_apply() {
        let toml = BadcToml {
            source: Some("WMO".to_string()),
            revised: Some("2024-01-12".to_string()),
            ..Default::default()
        };
        let expected = BadcConfig::default()
            .with_source("WMO")
            .with_revised(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
        assert_eq!(build_badc_config(&toml).unwrap(), expected);
    }

    #[test]
    fn badc_rejects_bad_date() {
        let toml = BadcToml {
            revised: Some("12/01/2024".to_string()),
            ..Default::default()
        };
        let err = build_badc_config(&toml).unwrap_err();
        assert!(err.to_string().contains("invalid [badc].revised date"));
    }

    #[test]
    fn trend_period_defaults() {
        let processing = ProcessingToml::default();
        assert_eq!(
            trend_period(&processing, 2023, Some((1850, 2023))).unwrap(),
            (1850, 2023)
        );
        assert_eq!(trend_period(&processing, 2023, None).unwrap(), (2023, 2023));
    }

    #[test]
    fn trend_period_explicit_and_invalid() {
        let processing = ProcessingToml {
            trend_start: Some(1993),
            trend_end: Some(2020),
            ..Default::default()
        };
        assert_eq!(
            trend_period(&processing, 2023, Some((1850, 2023))).unwrap(),
            (1993, 2020)
        );

        let backwards = ProcessingToml {
            trend_start: Some(2023),
            trend_end: Some(1993),
            ..Default::default()
        };
        assert!(trend_period(&backwards, 2023, None).is_err());

        let zero_window = ProcessingToml {
            running_mean: Some(0),
            ..Default::default()
        };
        assert!(trend_period(&zero_window, 2023, None).is_err());
    }
}
