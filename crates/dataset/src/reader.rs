//! Inspection-log readers: CSV text and the shared column handling.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::aggregate::{Aggregation, aggregate};
use crate::error::DatasetError;
use crate::record::InspectionRecord;
use crate::time_unit::TimeUnit;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Column layout and time handling of an inspection log.
///
/// The [`Default`] implementation expects columns `ID`, `State` and `Time`,
/// dates formatted as `%Y-%m-%d`, and one-day elapsed-time units.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Header of the asset id column.
    id_column: String,
    /// Header of the state label column.
    state_column: String,
    /// Header of the timestamp column.
    time_column: String,
    /// chrono format string for timestamps.
    time_format: String,
    /// Elapsed-time unit for transitions.
    time_unit: TimeUnit,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            id_column: "ID".into(),
            state_column: "State".into(),
            time_column: "Time".into(),
            time_format: "%Y-%m-%d".into(),
            time_unit: TimeUnit::DAY,
        }
    }
}

impl ReaderConfig {
    /// Set the asset id column header.
    pub fn with_id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = name.into();
        self
    }

    /// Set the state column header.
    pub fn with_state_column(mut self, name: impl Into<String>) -> Self {
        self.state_column = name.into();
        self
    }

    /// Set the timestamp column header.
    pub fn with_time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = name.into();
        self
    }

    /// Set the timestamp format (chrono `strftime` syntax).
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Set the elapsed-time unit.
    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = unit;
        self
    }

    /// Returns the elapsed-time unit.
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Returns the timestamp format.
    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    /// Validate the timestamp format.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidDateFormat`] if the format is empty or
    /// contains an unknown `%` specifier.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.time_format.trim().is_empty()
            || StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error))
        {
            return Err(DatasetError::InvalidDateFormat {
                format: self.time_format.clone(),
            });
        }
        Ok(())
    }

    /// Parses a non-blank timestamp cell.
    ///
    /// Date-only formats are accepted and yield midnight.
    fn parse_time(&self, row: usize, value: &str) -> Result<NaiveDateTime, DatasetError> {
        NaiveDateTime::parse_from_str(value, &self.time_format)
            .or_else(|_| {
                NaiveDate::parse_from_str(value, &self.time_format)
                    .map(|d| d.and_time(chrono::NaiveTime::MIN))
            })
            .map_err(|_| DatasetError::InvalidDate {
                row,
                value: value.to_string(),
                format: self.time_format.clone(),
            })
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads inspection rows from CSV text.
///
/// Cells are trimmed; empty state or time cells become `None`. Row numbers
/// in errors count the header as row 1.
///
/// # Errors
///
/// Returns [`DatasetError`] if the configuration is invalid, a configured
/// column is missing, the CSV is malformed, or a non-blank time cell does
/// not match the configured format.
pub fn read_inspections<R: Read>(
    reader: R,
    config: &ReaderConfig,
) -> Result<Vec<InspectionRecord>, DatasetError> {
    config.validate()?;

    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
    let columns = Columns::locate(&headers, config)?;

    let mut out = Vec::new();
    for (i, result) in csv.records().enumerate() {
        let record = result?;
        let cells: Vec<&str> = record.iter().collect();
        out.push(columns.inspection(i + 2, &cells, config)?);
    }
    Ok(out)
}

/// Positions of the configured columns in a header row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Columns {
    id: usize,
    state: usize,
    time: usize,
}

impl Columns {
    /// Finds the configured columns by exact header match.
    pub(crate) fn locate(headers: &[String], config: &ReaderConfig) -> Result<Self, DatasetError> {
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn {
                    name: name.to_string(),
                })
        };
        Ok(Self {
            id: column(&config.id_column)?,
            state: column(&config.state_column)?,
            time: column(&config.time_column)?,
        })
    }

    /// Builds the inspection in data row `row` from its trimmed cells.
    pub(crate) fn inspection(
        &self,
        row: usize,
        cells: &[&str],
        config: &ReaderConfig,
    ) -> Result<InspectionRecord, DatasetError> {
        let cell = |c: usize| cells.get(c).copied().filter(|v| !v.is_empty());
        let id = cell(self.id).unwrap_or_default();
        let state = cell(self.state).map(str::to_string);
        let time = cell(self.time)
            .map(|v| config.parse_time(row, v))
            .transpose()?;
        Ok(InspectionRecord::new(id, state, time))
    }
}

/// Reads a CSV inspection log and aggregates it into transitions.
///
/// # Errors
///
/// Returns [`DatasetError`] for I/O problems, malformed input, or a blank
/// asset id.
pub fn read_csv(path: &Path, config: &ReaderConfig) -> Result<Aggregation, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::Csv {
        reason: format!("{}: {e}", path.display()),
    })?;
    let aggregation = load_csv(file, config)?;
    info!(
        path = %path.display(),
        n_transitions = aggregation.transitions.len(),
        "transition records loaded"
    );
    Ok(aggregation)
}

/// Reads CSV text from any reader and aggregates it into transitions.
///
/// # Errors
///
/// See [`read_csv`].
pub fn load_csv<R: Read>(reader: R, config: &ReaderConfig) -> Result<Aggregation, DatasetError> {
    let rows = read_inspections(reader, config)?;
    aggregate(rows, config.time_unit, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ReaderConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_format_rejected() {
        let cfg = ReaderConfig::default().with_time_format("%Y-%Q");
        assert!(matches!(
            cfg.validate(),
            Err(DatasetError::InvalidDateFormat { .. })
        ));
        let cfg = ReaderConfig::default().with_time_format("");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parse_date_only_and_datetime() {
        let cfg = ReaderConfig::default();
        let t = cfg.parse_time(2, "2021-03-04").unwrap();
        assert_eq!(t.to_string(), "2021-03-04 00:00:00");

        let cfg = ReaderConfig::default().with_time_format("%d/%m/%Y %H:%M");
        let t = cfg.parse_time(2, "04/03/2021 12:30").unwrap();
        assert_eq!(t.to_string(), "2021-03-04 12:30:00");
    }

    #[test]
    fn parse_failure_reports_row() {
        let cfg = ReaderConfig::default();
        assert!(matches!(
            cfg.parse_time(9, "March 4"),
            Err(DatasetError::InvalidDate { row: 9, .. })
        ));
    }

    #[test]
    fn reads_blank_cells_as_none() {
        let text = "ID,State,Time\nA1,good,2020-01-01\nA1,,2020-02-01\nA1,bad,\n";
        let rows = read_inspections(text.as_bytes(), &ReaderConfig::default()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].state(), Some("good"));
        assert_eq!(rows[1].state(), None);
        assert!(rows[2].timestamp().is_none());
    }

    #[test]
    fn custom_columns() {
        let text = "Asset,Grade,Date\nP-1,1,2020-01-01\nP-1,2,2020-01-11\n";
        let cfg = ReaderConfig::default()
            .with_id_column("Asset")
            .with_state_column("Grade")
            .with_time_column("Date");
        let agg = load_csv(text.as_bytes(), &cfg).unwrap();
        assert_eq!(agg.n_state(), 2);
        assert_eq!(agg.transitions.len(), 1);
        assert_eq!(agg.transitions.records()[0].elapsed, 10);
    }

    #[test]
    fn missing_column_rejected() {
        let text = "ID,State\nA1,good\n";
        assert!(matches!(
            read_inspections(text.as_bytes(), &ReaderConfig::default()),
            Err(DatasetError::MissingColumn { name }) if name == "Time"
        ));
    }
}
