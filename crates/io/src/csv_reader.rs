//! Plain CSV readers.
//!
//! The header row names the columns; `year` and `value` are required,
//! `month` is required for monthly data and `uncertainty` is optional.
//! Column names are matched case-insensitively and empty cells are missing.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tellus_metadata::Metadata;
use tellus_series::{AnnualSeries, MonthlySeries, Series};
use tracing::debug;

use crate::error::IoError;

struct Columns {
    year: usize,
    month: Option<usize>,
    value: usize,
    uncertainty: Option<usize>,
}

/// Parsed rows; `months` is empty for annual files.
#[derive(Default)]
struct Table {
    years: Vec<i32>,
    months: Vec<u8>,
    values: Vec<f64>,
    uncertainty: Vec<f64>,
}

fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn resolve_columns(headers: &StringRecord, monthly: bool, path: &Path) -> Result<Columns, IoError> {
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect();
    let require = |column: &str| {
        map.get(column).copied().ok_or_else(|| IoError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
    };

    Ok(Columns {
        year: require("year")?,
        month: if monthly { Some(require("month")?) } else { None },
        value: require("value")?,
        uncertainty: map.get("uncertainty").copied(),
    })
}

fn cell<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("")
}

fn parse_value(text: &str) -> Result<f64, String> {
    if text.is_empty() {
        return Ok(f64::NAN);
    }
    text.parse().map_err(|_| format!("invalid number '{text}'"))
}

fn read_table(path: &Path, monthly: bool) -> Result<Table, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let csv_err = |e: csv::Error| IoError::Csv {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = resolve_columns(&headers, monthly, path)?;

    let mut table = Table::default();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = result.map_err(csv_err)?;
        let parse_err = |reason: String| IoError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let year_text = cell(&record, columns.year);
        let year = year_text
            .parse()
            .map_err(|_| parse_err(format!("invalid year '{year_text}'")))?;
        if let Some(m) = columns.month {
            let month_text = cell(&record, m);
            let month = month_text
                .parse()
                .map_err(|_| parse_err(format!("invalid month '{month_text}'")))?;
            table.months.push(month);
        }
        table.years.push(year);
        table
            .values
            .push(parse_value(cell(&record, columns.value)).map_err(parse_err)?);
        let uncertainty = match columns.uncertainty {
            Some(u) => parse_value(cell(&record, u)).map_err(parse_err)?,
            None => f64::NAN,
        };
        table.uncertainty.push(uncertainty);
    }

    debug!(path = %path.display(), rows = table.years.len(), "read csv");
    Ok(table)
}

/// Reads a monthly series from a `year,month,value[,uncertainty]` CSV file.
pub fn read_monthly_csv(path: &Path, metadata: Metadata) -> Result<Series, IoError> {
    let t = read_table(path, true)?;
    let series =
        MonthlySeries::with_uncertainty(t.years, t.months, t.values, t.uncertainty, metadata)?;
    Ok(series.into())
}

/// Reads an annual series from a `year,value[,uncertainty]` CSV file.
pub fn read_annual_csv(path: &Path, metadata: Metadata) -> Result<Series, IoError> {
    let t = read_table(path, false)?;
    let series = AnnualSeries::with_uncertainty(t.years, t.values, t.uncertainty, metadata)?;
    Ok(series.into())
}
