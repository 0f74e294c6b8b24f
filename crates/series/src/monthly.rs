//! Monthly series: one record per (year, month).

use std::collections::BTreeMap;
use std::path::Path;

use tellus_calendar::{days_in_month, month_name, monthly_time, validate_month};
use tellus_metadata::Metadata;
use tellus_stats::{mean, mean_uncertainty, nan_mean, rank_min};
use tracing::debug;

use crate::annual::{AnnualRecord, AnnualSeries};
use crate::badc::{self, BadcConfig, BadcDocument, BadcRow};
use crate::error::SeriesError;
use crate::validate;

/// A single monthly observation. Missing values are `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRecord {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1..=12).
    pub month: u8,
    /// Observed or derived value.
    pub value: f64,
    /// Optional uncertainty of `value`.
    pub uncertainty: Option<f64>,
}

/// Monthly climate indicator series with its own metadata.
///
/// Records are kept in (year, month) order. Methods taking `&mut self`
/// modify the series in place and return nothing; methods taking `&self`
/// that derive data return a new series.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    records: Vec<MonthlyRecord>,
    metadata: Metadata,
}

impl MonthlySeries {
    /// Creates a series from parallel year/month/value columns.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if the column lengths differ, a
    /// month is outside 1..=12, or a (year, month) pair occurs twice.
    pub fn new(
        years: Vec<i32>,
        months: Vec<u8>,
        values: Vec<f64>,
        metadata: Metadata,
    ) -> Result<Self, SeriesError> {
        let uncertainty = vec![f64::NAN; years.len()];
        Self::with_uncertainty(years, months, values, uncertainty, metadata)
    }

    /// Creates a series with a per-record uncertainty column.
    ///
    /// `NaN` uncertainties are stored as missing.
    ///
    /// # Errors
    ///
    /// As [`MonthlySeries::new`], plus a length check on `uncertainty`.
    pub fn with_uncertainty(
        years: Vec<i32>,
        months: Vec<u8>,
        values: Vec<f64>,
        uncertainty: Vec<f64>,
        metadata: Metadata,
    ) -> Result<Self, SeriesError> {
        validate::validate_lengths(
            years.len(),
            &[
                ("months", months.len()),
                ("values", values.len()),
                ("uncertainty", uncertainty.len()),
            ],
        )
        .finish()?;

        let records = years
            .into_iter()
            .zip(months)
            .zip(values)
            .zip(uncertainty)
            .map(|(((year, month), value), u)| MonthlyRecord {
                year,
                month,
                value,
                uncertainty: (!u.is_nan()).then_some(u),
            })
            .collect();
        Self::from_records(records, metadata)
    }

    /// Creates a series from complete records, sorting them by time.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] for a bad month or a duplicate
    /// (year, month) pair.
    pub fn from_records(
        mut records: Vec<MonthlyRecord>,
        metadata: Metadata,
    ) -> Result<Self, SeriesError> {
        let months: Vec<u8> = records.iter().map(|r| r.month).collect();
        let mut c = validate::validate_months(&months);
        c.merge(validate::validate_unique(
            records.iter().map(|r| (r.year, r.month)),
            |(y, m)| format!("{y}-{m:02}"),
        ));
        c.finish()?;

        records.sort_by_key(|r| (r.year, r.month));
        Ok(Self { records, metadata })
    }

    /// Returns the records in time order.
    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    /// Returns the year of each record.
    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// Returns the month of each record.
    pub fn months(&self) -> Vec<u8> {
        self.records.iter().map(|r| r.month).collect()
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

    /// Returns the value for `(year, month)`, or `None` if absent or missing.
    pub fn get_value(&self, year: i32, month: u8) -> Option<f64> {
        self.find(year, month)
            .map(|r| r.value)
            .filter(|v| !v.is_nan())
    }

    fn find(&self, year: i32, month: u8) -> Option<&MonthlyRecord> {
        self.records
            .binary_search_by_key(&(year, month), |r| (r.year, r.month))
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Returns the first and last years present.
    pub fn get_first_and_last_year(&self) -> Option<(i32, i32)> {
        Some((self.records.first()?.year, self.records.last()?.year))
    }

    /// Describes the covered period, e.g. `"January 1850 to December 2022"`.
    pub fn get_string_date_range(&self) -> Option<String> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        let first_name = month_name(first.month).ok()?;
        let last_name = month_name(last.month).ok()?;
        Some(format!(
            "{first_name} {} to {last_name} {}",
            first.year, last.year
        ))
    }

    /// Converts values to anomalies relative to `[start, end]`.
    ///
    /// Each calendar month gets its own climatology: the mean of that
    /// month's non-missing values in the period. Records on `climatology_*`,
    /// clears `actual` and appends `"Rebaselined to {start}-{end}"`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if `start > end`, or
    /// [`SeriesError::EmptyClimatology`] if a calendar month present in the
    /// series has no values in the period. The series is unchanged on error.
    pub fn rebaseline(&mut self, start: i32, end: i32) -> Result<(), SeriesError> {
        validate::validate_range(start, end)?;

        let mut climatology = [f64::NAN; 12];
        let mut present = [false; 12];
        for month in 1..=12u8 {
            let idx = usize::from(month) - 1;
            present[idx] = self.records.iter().any(|r| r.month == month);
            if !present[idx] {
                continue;
            }
            let in_period: Vec<f64> = self
                .records
                .iter()
                .filter(|r| r.month == month && (start..=end).contains(&r.year))
                .map(|r| r.value)
                .collect();
            climatology[idx] = nan_mean(&in_period);
            if climatology[idx].is_nan() {
                return Err(SeriesError::EmptyClimatology {
                    start,
                    end,
                    month: Some(month),
                });
            }
        }

        let mut metadata = self.metadata.clone();
        metadata.set_climatology(start, end)?;
        metadata.set("actual", false)?;
        metadata.push_history(format!("Rebaselined to {start}-{end}"))?;

        for record in &mut self.records {
            record.value -= climatology[usize::from(record.month) - 1];
        }
        self.metadata = metadata;
        debug!(start, end, n = self.records.len(), "rebaselined monthly series");
        Ok(())
    }

    /// Records `[start, end]` as the climatology period without changing
    /// values, for sources already published as anomalies.
    pub fn manually_set_baseline(&mut self, start: i32, end: i32) -> Result<(), SeriesError> {
        validate::validate_range(start, end)?;
        let mut metadata = self.metadata.clone();
        metadata.set_climatology(start, end)?;
        metadata.set("actual", false)?;
        metadata.push_history(format!("Manually set baseline to {start}-{end}"))?;
        self.metadata = metadata;
        Ok(())
    }

    /// Averages each year's records into an annual series.
    ///
    /// The annual value is the plain mean of whatever months that year has;
    /// a missing month makes the annual value missing. Uncertainties combine
    /// in quadrature over the group size.
    pub fn make_annual(&self) -> Result<AnnualSeries, SeriesError> {
        let mut groups: BTreeMap<i32, (Vec<f64>, Vec<Option<f64>>)> = BTreeMap::new();
        for record in &self.records {
            let group = groups.entry(record.year).or_default();
            group.0.push(record.value);
            group.1.push(record.uncertainty);
        }

        let records: Vec<AnnualRecord> = groups
            .into_iter()
            .map(|(year, (values, uncertainties))| AnnualRecord {
                year,
                value: mean(&values),
                uncertainty: mean_uncertainty(&uncertainties),
            })
            .collect();

        let mut metadata = self.metadata.clone();
        metadata.push_history("Calculated annual average")?;
        metadata.set("time_resolution", "annual")?;
        metadata.set("derived", true)?;
        debug!(n_years = records.len(), "calculated annual average");
        AnnualSeries::from_records(records, metadata)
    }

    /// Builds an annual series from one calendar month of each year.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Calendar`] if `month` is outside 1..=12.
    pub fn make_annual_by_selecting_month(&self, month: u8) -> Result<AnnualSeries, SeriesError> {
        let name = month_name(month)?;
        let records = self
            .records
            .iter()
            .filter(|r| r.month == month)
            .map(|r| AnnualRecord {
                year: r.year,
                value: r.value,
                uncertainty: r.uncertainty,
            })
            .collect();

        let mut metadata = self.metadata.clone();
        metadata.push_history(format!("Extracted {name} from each year"))?;
        metadata.set("time_resolution", "annual")?;
        AnnualSeries::from_records(records, metadata)
    }

    /// Keeps only records with years in `[start, end]`.
    ///
    /// Applying the same range twice leaves the series unchanged.
    pub fn select_year_range(&mut self, start: i32, end: i32) -> Result<(), SeriesError> {
        validate::validate_range(start, end)?;
        self.records.retain(|r| (start..=end).contains(&r.year));
        Ok(())
    }

    /// Rank of the value at `(year, month)`, 1 = highest.
    ///
    /// With `all = false` the value is ranked against the same calendar
    /// month in every year; with `all = true` against every record. Ties
    /// share the lowest rank of their group. Returns `None` if the record is
    /// absent or its value is missing.
    pub fn get_rank_from_year_and_month(&self, year: i32, month: u8, all: bool) -> Option<usize> {
        validate_month(month).ok()?;
        let candidates: Vec<&MonthlyRecord> = self
            .records
            .iter()
            .filter(|r| all || r.month == month)
            .collect();
        let idx = candidates
            .iter()
            .position(|r| r.year == year && r.month == month)?;
        let values: Vec<f64> = candidates.iter().map(|r| r.value).collect();
        rank_min(&values, false)[idx]
    }

    /// Renders the series as a BADC-CSV document.
    pub fn to_badc_string(&self, config: &BadcConfig) -> Result<String, SeriesError> {
        let rows = self
            .records
            .iter()
            .map(|r| -> Result<BadcRow, SeriesError> {
                Ok(BadcRow {
                    time: monthly_time(r.year, r.month)?,
                    year: r.year,
                    month: Some(r.month),
                    value: r.value,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let date_valid = match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => (
                format!("{:04}-{:02}-01", first.year, first.month),
                format!(
                    "{:04}-{:02}-{:02}",
                    last.year,
                    last.month,
                    days_in_month(last.year, last.month)?
                ),
            ),
            _ => (String::new(), String::new()),
        };

        badc::render(
            &BadcDocument {
                metadata: &self.metadata,
                date_valid,
                with_month: true,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::metadata;
    use approx::assert_relative_eq;

    /// Two calendar months over three years: Jan = 1, 2, 3 and Feb = 10, 20, 30.
    fn two_month_series() -> MonthlySeries {
        MonthlySeries::new(
            vec![2000, 2000, 2001, 2001, 2002, 2002],
            vec![1, 2, 1, 2, 1, 2],
            vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0],
            metadata("monthly"),
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let err = MonthlySeries::new(vec![2000, 2000], vec![1], vec![1.0, 2.0], metadata("monthly"))
            .unwrap_err();
        assert!(err.to_string().contains("months length 1 != years length 2"));
    }

    #[test]
    fn new_rejects_bad_month_and_duplicates() {
        let err = MonthlySeries::new(
            vec![2000, 2000, 2000],
            vec![13, 1, 1],
            vec![1.0, 2.0, 3.0],
            metadata("monthly"),
        )
        .unwrap_err();
        match err {
            SeriesError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("invalid month at index 0: 13"));
                assert!(details.contains("duplicate record for 2000-01"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn records_are_sorted_with_their_uncertainty() {
        let series = MonthlySeries::with_uncertainty(
            vec![2001, 2000],
            vec![1, 1],
            vec![5.0, 4.0],
            vec![0.5, f64::NAN],
            metadata("monthly"),
        )
        .unwrap();
        assert_eq!(series.years(), vec![2000, 2001]);
        assert_eq!(series.records()[0].uncertainty, None);
        assert_eq!(series.records()[1].uncertainty, Some(0.5));
    }

    #[test]
    fn get_value_absent_and_missing() {
        let series = MonthlySeries::new(
            vec![2000, 2000],
            vec![1, 2],
            vec![1.0, f64::NAN],
            metadata("monthly"),
        )
        .unwrap();
        assert_eq!(series.get_value(2000, 1), Some(1.0));
        assert_eq!(series.get_value(2000, 2), None);
        assert_eq!(series.get_value(1999, 1), None);
    }

    #[test]
    fn rebaseline_uses_per_month_climatology() {
        let mut series = two_month_series();
        series.rebaseline(2000, 2001).unwrap();

        let values = series.values();
        let expected = [-0.5, -5.0, 0.5, 5.0, 1.5, 15.0];
        for (got, want) in values.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }

        let meta = series.metadata();
        assert_eq!(meta.climatology().unwrap(), Some((2000, 2001)));
        assert!(!meta.get_bool("actual").unwrap());
        assert_eq!(meta.history().unwrap(), vec!["Rebaselined to 2000-2001"]);
    }

    #[test]
    fn manual_baseline_records_period_only() {
        let mut series = two_month_series();
        let values = series.values();
        series.manually_set_baseline(1991, 2020).unwrap();
        assert_eq!(series.values(), values);
        let meta = series.metadata();
        assert_eq!(meta.climatology().unwrap(), Some((1991, 2020)));
        assert!(!meta.get_bool("actual").unwrap());
        assert_eq!(
            meta.history().unwrap(),
            vec!["Manually set baseline to 1991-2020"]
        );
    }

    #[test]
    fn manual_baseline_with_reversed_period_leaves_series_unchanged() {
        let mut series = two_month_series();
        let before = series.clone();
        let err = series.manually_set_baseline(2020, 1991).unwrap_err();
        assert!(matches!(err, SeriesError::Validation { count: 1, .. }));
        assert_eq!(series, before);
    }

    #[test]
    fn rebaseline_without_period_data_leaves_series_unchanged() {
        let mut series = two_month_series();
        let before = series.clone();
        let err = series.rebaseline(1961, 1990).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::EmptyClimatology {
                start: 1961,
                end: 1990,
                month: Some(1)
            }
        ));
        assert_eq!(series, before);
    }

    #[test]
    fn make_annual_of_constant_months() {
        let years: Vec<i32> = (2000..2003).flat_map(|y| std::iter::repeat_n(y, 12)).collect();
        let months: Vec<u8> = (0..3).flat_map(|_| 1..=12u8).collect();
        let values: Vec<f64> = years.iter().map(|&y| f64::from(y - 2000) * 0.5).collect();
        let series = MonthlySeries::new(years, months, values, metadata("monthly")).unwrap();

        let annual = series.make_annual().unwrap();
        assert_eq!(annual.years(), vec![2000, 2001, 2002]);
        assert_relative_eq!(annual.get_value_from_year(2000).unwrap(), 0.0);
        assert_relative_eq!(annual.get_value_from_year(2001).unwrap(), 0.5);
        assert_relative_eq!(annual.get_value_from_year(2002).unwrap(), 1.0);

        let meta = annual.metadata();
        assert_eq!(meta.history().unwrap(), vec!["Calculated annual average"]);
        assert_eq!(meta.get_str("time_resolution").unwrap(), "annual");
        assert!(meta.get_bool("derived").unwrap());
        // Source series keeps its own metadata.
        assert!(series.metadata().history().unwrap().is_empty());
    }

    #[test]
    fn make_annual_propagates_missing_months() {
        let series = MonthlySeries::new(
            vec![2000, 2000, 2001, 2001],
            vec![1, 2, 1, 2],
            vec![1.0, f64::NAN, 2.0, 4.0],
            metadata("monthly"),
        )
        .unwrap();
        let annual = series.make_annual().unwrap();
        assert_eq!(annual.get_value_from_year(2000), None);
        assert_eq!(annual.get_value_from_year(2001), Some(3.0));
    }

    #[test]
    fn make_annual_combines_uncertainty() {
        let series = MonthlySeries::with_uncertainty(
            vec![2000, 2000],
            vec![1, 2],
            vec![1.0, 2.0],
            vec![0.3, 0.4],
            metadata("monthly"),
        )
        .unwrap();
        let annual = series.make_annual().unwrap();
        assert_relative_eq!(
            annual.get_uncertainty_from_year(2000).unwrap(),
            0.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn select_month() {
        let series = two_month_series();
        let feb = series.make_annual_by_selecting_month(2).unwrap();
        assert_eq!(feb.values(), vec![10.0, 20.0, 30.0]);
        let meta = feb.metadata();
        assert_eq!(meta.history().unwrap(), vec!["Extracted February from each year"]);
        assert_eq!(meta.get_str("time_resolution").unwrap(), "annual");
        assert!(!meta.get_bool("derived").unwrap());
        assert!(series.make_annual_by_selecting_month(0).is_err());
    }

    #[test]
    fn history_records_call_order() {
        let mut series = two_month_series();
        series.rebaseline(2000, 2002).unwrap();
        let annual = series.make_annual().unwrap();
        assert_eq!(
            annual.metadata().history().unwrap(),
            vec!["Rebaselined to 2000-2002", "Calculated annual average"]
        );
    }

    #[test]
    fn select_year_range_is_idempotent() {
        let mut series = two_month_series();
        series.select_year_range(2001, 2002).unwrap();
        let once = series.clone();
        series.select_year_range(2001, 2002).unwrap();
        assert_eq!(series, once);
        assert_eq!(series.years(), vec![2001, 2001, 2002, 2002]);
        assert!(series.select_year_range(2002, 2001).is_err());
    }

    #[test]
    fn rank_within_calendar_month() {
        let series = two_month_series();
        assert_eq!(series.get_rank_from_year_and_month(2002, 1, false), Some(1));
        assert_eq!(series.get_rank_from_year_and_month(2000, 1, false), Some(3));
        assert_eq!(series.get_rank_from_year_and_month(2000, 2, false), Some(3));
    }

    #[test]
    fn rank_against_all_months() {
        let series = two_month_series();
        assert_eq!(series.get_rank_from_year_and_month(2002, 2, true), Some(1));
        assert_eq!(series.get_rank_from_year_and_month(2002, 1, true), Some(4));
        assert_eq!(series.get_rank_from_year_and_month(2000, 1, true), Some(6));
    }

    #[test]
    fn rank_ties_share_lowest_rank() {
        let series = MonthlySeries::new(
            vec![2020, 2021, 2022],
            vec![6, 6, 6],
            vec![5.0, 5.0, 3.0],
            metadata("monthly"),
        )
        .unwrap();
        assert_eq!(series.get_rank_from_year_and_month(2020, 6, false), Some(1));
        assert_eq!(series.get_rank_from_year_and_month(2021, 6, false), Some(1));
        assert_eq!(series.get_rank_from_year_and_month(2022, 6, false), Some(3));
    }

    #[test]
    fn rank_missing_record_is_none() {
        let series = two_month_series();
        assert_eq!(series.get_rank_from_year_and_month(1999, 1, false), None);
        assert_eq!(series.get_rank_from_year_and_month(2000, 3, false), None);
        assert_eq!(series.get_rank_from_year_and_month(2000, 13, true), None);
    }

    #[test]
    fn date_range_text() {
        let series = two_month_series();
        assert_eq!(
            series.get_string_date_range().unwrap(),
            "January 2000 to February 2002"
        );
        assert_eq!(series.get_first_and_last_year(), Some((2000, 2002)));
    }

    #[test]
    fn badc_has_month_column() {
        let series = MonthlySeries::new(vec![1850], vec![1], vec![1.0], metadata("monthly")).unwrap();
        let text = series.to_badc_string(&BadcConfig::default()).unwrap();
        assert!(text.contains("long_name,month,month,1\ntype,month,int\n"));
        assert!(text.contains("data\ntime,year,month,data\n18262,1850,1,1.0000\nend data\n"));
        assert!(text.contains("date_valid,G,1850-01-01,1850-01-31\n"));
    }
}
