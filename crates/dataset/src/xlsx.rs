//! Excel (`.xlsx`) inspection-log reader.
//!
//! Only the first worksheet is read. Its first non-empty row is the header,
//! matched against the configured column names exactly as for CSV.

use std::fmt::Write as _;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use tracing::{debug, info};

use crate::aggregate::{Aggregation, aggregate};
use crate::error::DatasetError;
use crate::reader::{Columns, ReaderConfig};
use crate::record::InspectionRecord;

/// Reads inspection rows from the first worksheet of the workbook at `path`.
///
/// Cells are converted to text before parsing: whole numbers lose their
/// fractional part (`2.0` reads as state `"2"`), and date cells are printed
/// with the configured time format so they parse like text dates. Entirely
/// empty rows are ignored.
///
/// # Errors
///
/// Returns [`DatasetError::Workbook`] if the file cannot be opened as a
/// workbook or has no worksheet, and the same column and date errors as
/// [`read_inspections`](crate::read_inspections).
pub fn read_xlsx_inspections(
    path: &Path,
    config: &ReaderConfig,
) -> Result<Vec<InspectionRecord>, DatasetError> {
    config.validate()?;

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DatasetError::Workbook {
            reason: format!("{}: workbook has no worksheets", path.display()),
        })??;
    let header_row = range.start().map_or(1, |(r, _)| r as usize + 1);
    debug!(path = %path.display(), header_row, "reading first worksheet");

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(|c| cell_text(c, config)).collect())
        .unwrap_or_default();
    let columns = Columns::locate(&headers, config)?;

    let mut out = Vec::new();
    for (i, cells) in rows.enumerate() {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let text: Vec<String> = cells.iter().map(|c| cell_text(c, config)).collect();
        let refs: Vec<&str> = text.iter().map(String::as_str).collect();
        out.push(columns.inspection(header_row + 1 + i, &refs, config)?);
    }
    Ok(out)
}

/// Reads an Excel inspection log and aggregates it into transitions.
///
/// # Errors
///
/// See [`read_xlsx_inspections`].
pub fn read_xlsx(path: &Path, config: &ReaderConfig) -> Result<Aggregation, DatasetError> {
    let rows = read_xlsx_inspections(path, config)?;
    let aggregation = aggregate(rows, config.time_unit(), 2)?;
    info!(
        path = %path.display(),
        n_transitions = aggregation.transitions.len(),
        "transition records loaded"
    );
    Ok(aggregation)
}

/// Trimmed text of one cell.
fn cell_text(cell: &Data, config: &ReaderConfig) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(t) => {
                let mut out = String::new();
                match write!(out, "{}", t.format(config.time_format())) {
                    Ok(()) => out,
                    Err(_) => t.to_string(),
                }
            }
            None => dt.as_f64().to_string(),
        },
        Data::Error(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn whole_numbers_read_as_integers() {
        let cfg = ReaderConfig::default();
        assert_eq!(cell_text(&Data::Float(2.0), &cfg), "2");
        assert_eq!(cell_text(&Data::Float(2.5), &cfg), "2.5");
        assert_eq!(cell_text(&Data::Int(7), &cfg), "7");
        assert_eq!(cell_text(&Data::String("  good ".into()), &cfg), "good");
        assert_eq!(cell_text(&Data::Empty, &cfg), "");
        assert_eq!(cell_text(&Data::Error(CellErrorType::NA), &cfg), "#N/A");
    }

    #[test]
    fn date_cells_use_the_time_format() {
        // Excel serial 43831 is 2020-01-01.
        let date = Data::DateTime(ExcelDateTime::new(
            43831.5,
            ExcelDateTimeType::DateTime,
            false,
        ));
        let cfg = ReaderConfig::default().with_time_format("%d/%m/%Y %H:%M");
        assert_eq!(cell_text(&date, &cfg), "01/01/2020 12:00");
    }

    #[test]
    fn non_workbook_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.xlsx");
        std::fs::write(&path, "ID,State,Time\n").unwrap();
        assert!(matches!(
            read_xlsx_inspections(&path, &ReaderConfig::default()),
            Err(DatasetError::Workbook { .. })
        ));
    }
}
