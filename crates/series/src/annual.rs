//! Annual series: at most one record per year.

use std::path::Path;

use tellus_calendar::annual_time;
use tellus_metadata::Metadata;
use tellus_stats::{mean_uncertainty, nan_mean, rank_min, rolling_mean};
use tracing::debug;

use crate::badc::{self, BadcConfig, BadcDocument, BadcRow};
use crate::error::SeriesError;
use crate::validate;

/// A single annual observation. Missing values are `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualRecord {
    /// Calendar year.
    pub year: i32,
    /// Observed or derived value.
    pub value: f64,
    /// Optional uncertainty of `value`.
    pub uncertainty: Option<f64>,
}

/// Annual climate indicator series with its own metadata.
///
/// Same mutation convention as [`MonthlySeries`](crate::MonthlySeries):
/// `&mut self` methods change the series in place and return nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSeries {
    records: Vec<AnnualRecord>,
    metadata: Metadata,
}

impl AnnualSeries {
    /// Creates a series from parallel year/value columns.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if the lengths differ or a year
    /// occurs twice.
    pub fn new(years: Vec<i32>, values: Vec<f64>, metadata: Metadata) -> Result<Self, SeriesError> {
        let uncertainty = vec![f64::NAN; years.len()];
        Self::with_uncertainty(years, values, uncertainty, metadata)
    }

    /// Creates a series with a per-record uncertainty column.
    ///
    /// `NaN` uncertainties are stored as missing.
    pub fn with_uncertainty(
        years: Vec<i32>,
        values: Vec<f64>,
        uncertainty: Vec<f64>,
        metadata: Metadata,
    ) -> Result<Self, SeriesError> {
        validate::validate_lengths(
            years.len(),
            &[("values", values.len()), ("uncertainty", uncertainty.len())],
        )
        .finish()?;

        let records = years
            .into_iter()
            .zip(values)
            .zip(uncertainty)
            .map(|((year, value), u)| AnnualRecord {
                year,
                value,
                uncertainty: (!u.is_nan()).then_some(u),
            })
            .collect();
        Self::from_records(records, metadata)
    }

    /// Creates a series from complete records, sorting them by year.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if a year occurs twice.
    pub fn from_records(
        mut records: Vec<AnnualRecord>,
        metadata: Metadata,
    ) -> Result<Self, SeriesError> {
        validate::validate_unique(records.iter().map(|r| r.year), |y| y.to_string()).finish()?;
        records.sort_by_key(|r| r.year);
        Ok(Self { records, metadata })
    }

    /// Returns the records in year order.
    pub fn records(&self) -> &[AnnualRecord] {
        &self.records
    }

    /// Returns the year of each record.
    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// Returns the value of each record.
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the series holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the series metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the series metadata for modification.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    fn position(&self, year: i32) -> Option<usize> {
        self.records.binary_search_by_key(&year, |r| r.year).ok()
    }

    /// Returns the value for `year`, or `None` if absent or missing.
    pub fn get_value_from_year(&self, year: i32) -> Option<f64> {
        self.position(year)
            .map(|idx| self.records[idx].value)
            .filter(|v| !v.is_nan())
    }

    /// Returns the uncertainty for `year`, if recorded.
    pub fn get_uncertainty_from_year(&self, year: i32) -> Option<f64> {
        self.position(year).and_then(|idx| self.records[idx].uncertainty)
    }

    /// Ranks of every record, 1 = highest unless `ascending`.
    ///
    /// Ties share the lowest rank of their group; missing values are unranked.
    pub fn ranks(&self, ascending: bool) -> Vec<Option<usize>> {
        rank_min(&self.values(), ascending)
    }

    /// Rank of `year`'s value across the whole series, 1 = highest.
    ///
    /// Returns `None` if the year is absent or its value is missing.
    pub fn get_rank_from_year(&self, year: i32) -> Option<usize> {
        self.get_rank_from_year_ordered(year, false)
    }

    /// As [`get_rank_from_year`](Self::get_rank_from_year), with rank 1 the
    /// lowest value when `ascending` is set.
    pub fn get_rank_from_year_ordered(&self, year: i32, ascending: bool) -> Option<usize> {
        let idx = self.position(year)?;
        self.ranks(ascending)[idx]
    }

    /// Every year holding `rank`. Empty when no record occupies that slot,
    /// which happens for ranks skipped over by a tie.
    pub fn get_year_from_rank(&self, rank: usize) -> Vec<i32> {
        self.ranks(false)
            .into_iter()
            .zip(&self.records)
            .filter(|(r, _)| *r == Some(rank))
            .map(|(_, record)| record.year)
            .collect()
    }

    /// Returns the first and last years present.
    pub fn get_first_and_last_year(&self) -> Option<(i32, i32)> {
        Some((self.records.first()?.year, self.records.last()?.year))
    }

    /// Describes the covered period, e.g. `"1850-2022"`.
    pub fn get_string_date_range(&self) -> Option<String> {
        let (first, last) = self.get_first_and_last_year()?;
        Some(format!("{first}-{last}"))
    }

    /// Subtracts the mean of the non-missing values in `[start, end]` from
    /// every record.
    ///
    /// Records on `climatology_*`, clears `actual` and appends
    /// `"Rebaselined to {start}-{end}"`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if `start > end`, or
    /// [`SeriesError::EmptyClimatology`] if the period holds no values.
    pub fn rebaseline(&mut self, start: i32, end: i32) -> Result<(), SeriesError> {
        validate::validate_range(start, end)?;
        let in_period: Vec<f64> = self
            .records
            .iter()
            .filter(|r| (start..=end).contains(&r.year))
            .map(|r| r.value)
            .collect();
        let climatology = nan_mean(&in_period);
        if climatology.is_nan() {
            return Err(SeriesError::EmptyClimatology {
                start,
                end,
                month: None,
            });
        }

        let mut metadata = self.metadata.clone();
        metadata.set_climatology(start, end)?;
        metadata.set("actual", false)?;
        metadata.push_history(format!("Rebaselined to {start}-{end}"))?;

        for record in &mut self.records {
            record.value -= climatology;
        }
        self.metadata = metadata;
        debug!(start, end, climatology, "rebaselined annual series");
        Ok(())
    }

    /// Records `[start, end]` as the climatology period without changing values.
    pub fn manually_set_baseline(&mut self, start: i32, end: i32) -> Result<(), SeriesError> {
        validate::validate_range(start, end)?;
        let mut metadata = self.metadata.clone();
        metadata.set_climatology(start, end)?;
        metadata.set("actual", false)?;
        metadata.push_history(format!("Manually set baseline to {start}-{end}"))?;
        self.metadata = metadata;
        Ok(())
    }

    /// Trailing `window`-year running mean as a new series.
    ///
    /// The first `window - 1` records, and any window containing a missing
    /// value, are missing in the result.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if `window` is zero.
    pub fn running_mean(&self, window: usize) -> Result<AnnualSeries, SeriesError> {
        if window == 0 {
            return Err(SeriesError::Validation {
                count: 1,
                details: "running mean window must be at least 1".to_string(),
            });
        }

        let smoothed = rolling_mean(&self.values(), window);
        let uncertainties: Vec<Option<f64>> = self.records.iter().map(|r| r.uncertainty).collect();
        let records = self
            .records
            .iter()
            .zip(smoothed)
            .enumerate()
            .map(|(i, (record, value))| AnnualRecord {
                year: record.year,
                value,
                uncertainty: if i + 1 >= window {
                    mean_uncertainty(&uncertainties[i + 1 - window..=i])
                } else {
                    None
                },
            })
            .collect();

        let mut metadata = self.metadata.clone();
        metadata.push_history(format!("Calculated {window}-year running mean"))?;
        metadata.set("derived", true)?;
        debug!(window, "calculated running mean");
        Ok(AnnualSeries { records, metadata })
    }

    /// Adds `offset` to every value.
    pub fn add_offset(&mut self, offset: f64) -> Result<(), SeriesError> {
        let mut metadata = self.metadata.clone();
        metadata.push_history(format!("Added offset of {offset}"))?;
        metadata.set("derived", true)?;
        for record in &mut self.records {
            record.value += offset;
        }
        self.metadata = metadata;
        Ok(())
    }

    /// Keeps only years whose last digit is `end_digit` (0 keeps 1980, 1990, …).
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if `end_digit` exceeds 9.
    pub fn select_decade(&mut self, end_digit: u8) -> Result<(), SeriesError> {
        if end_digit > 9 {
            return Err(SeriesError::Validation {
                count: 1,
                details: format!("decade end digit must be 0..=9, got {end_digit}"),
            });
        }
        let mut metadata = self.metadata.clone();
        metadata.push_history(format!("Selected years ending in {end_digit}"))?;
        metadata.set("derived", true)?;
        self.records
            .retain(|r| r.year.rem_euclid(10) == i32::from(end_digit));
        self.metadata = metadata;
        Ok(())
    }

    /// Keeps only records with years in `[start, end]`.
    ///
    /// Applying the same range twice leaves the series unchanged.
    pub fn select_year_range(&mut self, start: i32, end: i32) -> Result<(), SeriesError> {
        validate::validate_range(start, end)?;
        self.records.retain(|r| (start..=end).contains(&r.year));
        Ok(())
    }

    /// Renders the series as a BADC-CSV document.
    pub fn to_badc_string(&self, config: &BadcConfig) -> Result<String, SeriesError> {
        let rows = self
            .records
            .iter()
            .map(|r| -> Result<BadcRow, SeriesError> {
                Ok(BadcRow {
                    time: annual_time(r.year)?,
                    year: r.year,
                    month: None,
                    value: r.value,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let date_valid = match self.get_first_and_last_year() {
            Some((first, last)) => (format!("{first:04}-01-01"), format!("{last:04}-12-31")),
            None => (String::new(), String::new()),
        };

        badc::render(
            &BadcDocument {
                metadata: &self.metadata,
                date_valid,
                with_month: false,
                rows,
            },
            config,
        )
    }

    /// Writes the series to `path` as BADC-CSV.
    pub fn write_badc(&self, path: &Path, config: &BadcConfig) -> Result<(), SeriesError> {
        let text = self.to_badc_string(config)?;
        badc::write_file(path, &text)
    }
}
