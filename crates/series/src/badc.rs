//! BADC-CSV output: a metadata preamble, column descriptors, and a data
//! block delimited by `data` / `end data`.
//!
//! Field order and labels are fixed; downstream consumers depend on them.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use tellus_calendar::EPOCH_LABEL;
use tellus_metadata::Metadata;

use crate::error::SeriesError;

// ---------------------------------------------------------------------------
// BadcConfig
// ---------------------------------------------------------------------------

/// Fixed preamble fields that do not come from series metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadcConfig {
    creator: String,
    source: String,
    observation_station: String,
    location: String,
    activity: String,
    rights: String,
    comments: String,
    /// Revision date; `None` means today.
    revised: Option<NaiveDate>,
}

impl Default for BadcConfig {
    fn default() -> Self {
        Self {
            creator: "tellus".into(),
            source: "Derived from published climate indicator datasets".into(),
            observation_station: "N/A".into(),
            location: "global".into(),
            activity: "Climate indicator dashboard".into(),
            rights: "See the citations of the source datasets".into(),
            comments: "Missing values are left blank".into(),
            revised: None,
        }
    }
}

impl BadcConfig {
    /// Sets the `creator` field.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Sets the `source` field.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the `observation_station` field.
    pub fn with_observation_station(mut self, station: impl Into<String>) -> Self {
        self.observation_station = station.into();
        self
    }

    /// Sets the `location` field.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the `activity` field.
    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = activity.into();
        self
    }

    /// Sets the `rights` field.
    pub fn with_rights(mut self, rights: impl Into<String>) -> Self {
        self.rights = rights.into();
        self
    }

    /// Sets the `comments` field.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    /// Pins `last_revised_date` instead of using today's date.
    pub fn with_revised(mut self, date: NaiveDate) -> Self {
        self.revised = Some(date);
        self
    }

    /// Rejects empty identifying fields.
    fn validate(&self) -> Result<(), SeriesError> {
        let fields = [
            ("creator", &self.creator),
            ("source", &self.source),
            ("location", &self.location),
        ];
        let bad: Vec<String> = fields
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| format!("{k} must not be empty"))
            .collect();
        if bad.is_empty() {
            Ok(())
        } else {
            Err(SeriesError::Validation {
                count: bad.len(),
                details: bad.join("; "),
            })
        }
    }

    fn revised_date(&self) -> NaiveDate {
        self.revised.unwrap_or_else(|| Local::now().date_naive())
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// One data row ready for output.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BadcRow {
    pub(crate) time: i64,
    pub(crate) year: i32,
    pub(crate) month: Option<u8>,
    pub(crate) value: f64,
}

/// Series-specific inputs to [`render`].
pub(crate) struct BadcDocument<'a> {
    pub(crate) metadata: &'a Metadata,
    /// First and last valid dates, already formatted as `YYYY-MM-DD`.
    pub(crate) date_valid: (String, String),
    pub(crate) with_month: bool,
    pub(crate) rows: Vec<BadcRow>,
}

fn optional_str(metadata: &Metadata, key: &str) -> Option<String> {
    metadata.get_str(key).ok().map(str::to_string)
}

/// Renders a complete BADC-CSV document.
///
/// Fields holding commas, quotes or line breaks are quoted as in RFC 4180.
pub(crate) fn render(doc: &BadcDocument<'_>, config: &BadcConfig) -> Result<String, SeriesError> {
    config.validate()?;
    let meta = doc.metadata;

    let title = optional_str(meta, "display_name")
        .or_else(|| optional_str(meta, "name"))
        .unwrap_or_default();
    let variable = optional_str(meta, "long_name")
        .or_else(|| optional_str(meta, "variable"))
        .unwrap_or_else(|| "data".to_string());
    let units = optional_str(meta, "units").unwrap_or_else(|| "1".to_string());
    let history = meta.history()?;
    let citations = meta.get_str_list("citation").unwrap_or_default();
    let revised = config.revised_date().format("%Y-%m-%d").to_string();

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    wtr.write_record(["Conventions", "G", "BADC-CSV", "1"])?;
    wtr.write_record(["title", "G", title.as_str()])?;
    wtr.write_record(["last_revised_date", "G", revised.as_str()])?;
    wtr.write_record([
        "date_valid",
        "G",
        doc.date_valid.0.as_str(),
        doc.date_valid.1.as_str(),
    ])?;
    wtr.write_record(["feature_type", "G", "time series"])?;
    wtr.write_record(["creator", "G", config.creator.as_str()])?;
    wtr.write_record(["source", "G", config.source.as_str()])?;
    wtr.write_record(["observation_station", "G", config.observation_station.as_str()])?;
    wtr.write_record(["location", "G", config.location.as_str()])?;
    wtr.write_record(["activity", "G", config.activity.as_str()])?;
    for entry in &history {
        wtr.write_record(["history", "G", entry.as_str()])?;
    }
    for citation in &citations {
        wtr.write_record(["reference", "G", citation.as_str()])?;
    }
    wtr.write_record(["rights", "G", config.rights.as_str()])?;
    wtr.write_record(["comments", "G", config.comments.as_str()])?;

    wtr.write_record(["long_name", "time", "time", EPOCH_LABEL])?;
    wtr.write_record(["type", "time", "int"])?;
    wtr.write_record(["coordinate_variable", "time", "t"])?;
    wtr.write_record(["long_name", "year", "year", "1"])?;
    wtr.write_record(["type", "year", "int"])?;
    if doc.with_month {
        wtr.write_record(["long_name", "month", "month", "1"])?;
        wtr.write_record(["type", "month", "int"])?;
    }
    wtr.write_record(["long_name", "data", variable.as_str(), units.as_str()])?;
    wtr.write_record(["type", "data", "float"])?;

    wtr.write_record([DATA_MARKER])?;
    if doc.with_month {
        wtr.write_record(["time", "year", "month", "data"])?;
    } else {
        wtr.write_record(["time", "year", "data"])?;
    }
    for row in &doc.rows {
        let value = if row.value.is_nan() {
            String::new()
        } else {
            format!("{:.4}", row.value)
        };
        let mut record = vec![row.time.to_string(), row.year.to_string()];
        if let Some(month) = row.month {
            record.push(month.to_string());
        }
        record.push(value);
        wtr.write_record(&record)?;
    }
    wtr.write_record([END_MARKER])?;

    let bytes = wtr.into_inner().map_err(|e| SeriesError::Csv {
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| SeriesError::Csv {
        reason: e.to_string(),
    })
}

/// Writes `text` to `path`.
pub(crate) fn write_file(path: &Path, text: &str) -> Result<(), SeriesError> {
    fs::write(path, text).map_err(|e| SeriesError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

const DATA_MARKER: &str = "data";
const END_MARKER: &str = "end data";

/// The parts of a BADC-CSV document needed to rebuild a series.
#[derive(Debug, Clone, PartialEq)]
pub struct BadcTable {
    /// Global attributes (`key,G,value` records) in file order. Values
    /// spanning several cells, such as `date_valid`, are joined with `,`.
    pub globals: Vec<(String, String)>,
    /// Column names from the header row of the data block.
    pub header: Vec<String>,
    /// 1-based line number of the header row.
    pub header_line: usize,
    /// Data rows, one cell per column.
    pub rows: Vec<Vec<String>>,
}

impl BadcTable {
    /// Returns every value of the named column.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.header.iter().position(|h| h == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map_or("", String::as_str))
                .collect(),
        )
    }

    /// Returns the values of every global attribute named `key`.
    pub fn global(&self, key: &str) -> Vec<&str> {
        self.globals
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

fn is_marker(record: &csv::StringRecord, marker: &str) -> bool {
    record.len() == 1 && record.get(0).is_some_and(|c| c.trim() == marker)
}

fn record_line(record: &csv::StringRecord) -> usize {
    record
        .position()
        .map_or(0, |p| usize::try_from(p.line()).unwrap_or(usize::MAX))
}

fn next_record(
    records: &mut csv::StringRecordsIter<'_, &[u8]>,
    last_line: usize,
) -> Result<Option<csv::StringRecord>, SeriesError> {
    records.next().transpose().map_err(|e| SeriesError::Parse {
        line: e
            .position()
            .map_or(last_line, |p| usize::try_from(p.line()).unwrap_or(usize::MAX)),
        reason: e.to_string(),
    })
}

/// Parses a BADC-CSV document into its globals and data block.
///
/// # Errors
///
/// Returns [`SeriesError::Parse`] if the document is not valid CSV, the
/// `data` marker, header row, or `end data` marker is missing, or a row has
/// the wrong number of cells.
pub fn parse_badc(text: &str) -> Result<BadcTable, SeriesError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());
    let mut records = reader.records();
    let last_line = text.lines().count();

    let mut globals = Vec::new();
    loop {
        let Some(record) = next_record(&mut records, last_line)? else {
            return Err(SeriesError::Parse {
                line: last_line,
                reason: "missing 'data' marker".to_string(),
            });
        };
        if is_marker(&record, DATA_MARKER) {
            break;
        }
        if record.len() >= 3 && record.get(1) == Some("G") {
            let value = record.iter().skip(2).collect::<Vec<_>>().join(",");
            globals.push((record[0].to_string(), value));
        }
    }

    let Some(header_record) = next_record(&mut records, last_line)? else {
        return Err(SeriesError::Parse {
            line: last_line,
            reason: "missing header row after 'data'".to_string(),
        });
    };
    let header: Vec<String> = header_record.iter().map(|h| h.trim().to_string()).collect();
    let header_line = record_line(&header_record);

    let mut rows = Vec::new();
    while let Some(record) = next_record(&mut records, last_line)? {
        if is_marker(&record, END_MARKER) {
            return Ok(BadcTable {
                globals,
                header,
                header_line,
                rows,
            });
        }
        if record.len() != header.len() {
            return Err(SeriesError::Parse {
                line: record_line(&record),
                reason: format!("expected {} cells, found {}", header.len(), record.len()),
            });
        }
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    Err(SeriesError::Parse {
        line: last_line,
        reason: "missing 'end data' marker".to_string(),
    })
}
