//! Either kind of series, as produced by a reader.

use std::path::Path;

use tellus_metadata::Metadata;

use crate::annual::AnnualSeries;
use crate::badc::BadcConfig;
use crate::error::SeriesError;
use crate::monthly::MonthlySeries;

/// A monthly or annual series.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// One record per (year, month).
    Monthly(MonthlySeries),
    /// One record per year.
    Annual(AnnualSeries),
}

impl Series {
    /// Returns the metadata of the wrapped series.
    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Monthly(s) => s.metadata(),
            Self::Annual(s) => s.metadata(),
        }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        match self {
            Self::Monthly(s) => s.len(),
            Self::Annual(s) => s.len(),
        }
    }

    /// Returns `true` if the series holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts to an annual series, averaging monthly data.
    pub fn into_annual(self) -> Result<AnnualSeries, SeriesError> {
        match self {
            Self::Monthly(s) => s.make_annual(),
            Self::Annual(s) => Ok(s),
        }
    }

    /// Rebaselines the wrapped series in place.
    pub fn rebaseline(&mut self, start: i32, end: i32) -> Result<(), SeriesError> {
        match self {
            Self::Monthly(s) => s.rebaseline(start, end),
            Self::Annual(s) => s.rebaseline(start, end),
        }
    }

    /// Writes the wrapped series to `path` as BADC-CSV.
    pub fn write_badc(&self, path: &Path, config: &BadcConfig) -> Result<(), SeriesError> {
        match self {
            Self::Monthly(s) => s.write_badc(path, config),
            Self::Annual(s) => s.write_badc(path, config),
        }
    }
}

impl From<MonthlySeries> for Series {
    fn from(series: MonthlySeries) -> Self {
        Self::Monthly(series)
    }
}

impl From<AnnualSeries> for Series {
    fn from(series: AnnualSeries) -> Self {
        Self::Annual(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::metadata;

    #[test]
    fn into_annual_averages_monthly() {
        let monthly = MonthlySeries::new(
            vec![2000, 2000],
            vec![1, 2],
            vec![1.0, 3.0],
            metadata("monthly"),
        )
        .unwrap();
        let series = Series::from(monthly);
        assert_eq!(series.len(), 2);
        let annual = series.into_annual().unwrap();
        assert_eq!(annual.get_value_from_year(2000), Some(2.0));
    }

    #[test]
    fn into_annual_passes_annual_through() {
        let annual = AnnualSeries::new(vec![2000], vec![1.5], metadata("annual")).unwrap();
        let series = Series::from(annual.clone());
        assert_eq!(series.into_annual().unwrap(), annual);
    }

    #[test]
    fn rebaseline_dispatches() {
        let annual =
            AnnualSeries::new(vec![2000, 2001], vec![1.0, 3.0], metadata("annual")).unwrap();
        let mut series = Series::Annual(annual);
        series.rebaseline(2000, 2001).unwrap();
        assert_eq!(
            series.metadata().history().unwrap(),
            vec!["Rebaselined to 2000-2001"]
        );
        assert!(!series.is_empty());
    }
}
