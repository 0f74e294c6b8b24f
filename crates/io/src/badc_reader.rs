//! BADC-CSV readers.

use std::fs;
use std::path::Path;

use tellus_metadata::Metadata;
use tellus_series::{AnnualSeries, BadcTable, MonthlySeries, Series, parse_badc};
use tracing::debug;

use crate::error::IoError;

fn load(path: &Path) -> Result<BadcTable, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let table = parse_badc(&text)?;
    debug!(path = %path.display(), rows = table.rows.len(), "read badc");
    Ok(table)
}

fn column<'t>(table: &'t BadcTable, name: &str, path: &Path) -> Result<Vec<&'t str>, IoError> {
    table.column(name).ok_or_else(|| IoError::MissingColumn {
        column: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Parses every cell of a column; data rows start on the line after the header.
fn parse_column<T: std::str::FromStr>(
    cells: &[&str],
    label: &str,
    first_line: usize,
    path: &Path,
) -> Result<Vec<T>, IoError> {
    cells
        .iter()
        .enumerate()
        .map(|(i, text)| {
            text.parse().map_err(|_| IoError::Parse {
                path: path.to_path_buf(),
                line: first_line + i,
                reason: format!("invalid {label} '{text}'"),
            })
        })
        .collect()
}

fn parse_data(cells: &[&str], first_line: usize, path: &Path) -> Result<Vec<f64>, IoError> {
    cells
        .iter()
        .enumerate()
        .map(|(i, text)| {
            if text.is_empty() {
                return Ok(f64::NAN);
            }
            text.parse().map_err(|_| IoError::Parse {
                path: path.to_path_buf(),
                line: first_line + i,
                reason: format!("invalid data '{text}'"),
            })
        })
        .collect()
}

/// Line number of the first data row, for error messages.
fn first_data_line(table: &BadcTable) -> usize {
    table.header_line + 1
}

/// Reads a monthly series from a BADC-CSV file with a `month` column.
pub fn read_monthly_badc(path: &Path, metadata: Metadata) -> Result<Series, IoError> {
    let table = load(path)?;
    let first = first_data_line(&table);
    let years = parse_column(&column(&table, "year", path)?, "year", first, path)?;
    let months = parse_column(&column(&table, "month", path)?, "month", first, path)?;
    let values = parse_data(&column(&table, "data", path)?, first, path)?;
    Ok(MonthlySeries::new(years, months, values, metadata)?.into())
}

/// Reads an annual series from a BADC-CSV file.
pub fn read_annual_badc(path: &Path, metadata: Metadata) -> Result<Series, IoError> {
    let table = load(path)?;
    let first = first_data_line(&table);
    let years = parse_column(&column(&table, "year", path)?, "year", first, path)?;
    let values = parse_data(&column(&table, "data", path)?, first, path)?;
    Ok(AnnualSeries::new(years, values, metadata)?.into())
}
