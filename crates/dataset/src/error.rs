//! Error types for the deterior-dataset crate.

/// Error type for all fallible operations in the deterior-dataset crate.
///
/// Structural defects (blank asset ids, malformed configuration, missing
/// columns) abort the whole load. Rows with a blank state or timestamp are
/// not errors; they are skipped and reported through
/// [`SkippedRow`](crate::SkippedRow).
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Returned when an inspection row has an empty asset id.
    #[error("blank asset id in row {row}")]
    BlankAssetId {
        /// 1-based row number.
        row: usize,
    },

    /// Returned when a time unit specification cannot be parsed.
    #[error("invalid time unit {spec:?}: {reason}")]
    InvalidTimeUnit {
        /// The offending specification.
        spec: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a date format string contains an unknown specifier.
    #[error("invalid date format {format:?}")]
    InvalidDateFormat {
        /// The offending format string.
        format: String,
    },

    /// Returned when a non-blank timestamp does not match the date format.
    #[error("row {row}: cannot parse {value:?} as a date with format {format:?}")]
    InvalidDate {
        /// 1-based row number.
        row: usize,
        /// The raw timestamp text.
        value: String,
        /// The date format in use.
        format: String,
    },

    /// Returned when a required column is absent from the header.
    #[error("missing column {name:?} in dataset")]
    MissingColumn {
        /// Configured column name.
        name: String,
    },

    /// Returned when a transition refers to a state outside `0..n_state`.
    #[error("state index {index} out of range for {n_state} states")]
    StateOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of states.
        n_state: usize,
    },

    /// Returned when an inspection gap does not fit in `u32` time units.
    #[error("asset {asset:?}: elapsed time of {elapsed} units out of range")]
    ElapsedOutOfRange {
        /// Asset id of the offending pair.
        asset: String,
        /// Elapsed time in units.
        elapsed: i64,
    },

    /// Wraps an error from the Excel workbook reader.
    #[error("workbook error: {reason}")]
    Workbook {
        /// Description of the underlying workbook failure.
        reason: String,
    },

    /// Wraps an error from the CSV parser.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },
}

impl From<calamine::XlsxError> for DatasetError {
    fn from(e: calamine::XlsxError) -> Self {
        DatasetError::Workbook {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        DatasetError::Csv {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_blank_asset_id() {
        let e = DatasetError::BlankAssetId { row: 7 };
        assert_eq!(e.to_string(), "blank asset id in row 7");
    }

    #[test]
    fn error_invalid_time_unit() {
        let e = DatasetError::InvalidTimeUnit {
            spec: "3w".to_string(),
            reason: "unknown suffix 'w'".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid time unit \"3w\": unknown suffix 'w'"
        );
    }

    #[test]
    fn error_state_out_of_range() {
        let e = DatasetError::StateOutOfRange {
            index: 4,
            n_state: 3,
        };
        assert_eq!(e.to_string(), "state index 4 out of range for 3 states");
    }

    #[test]
    fn error_missing_column() {
        let e = DatasetError::MissingColumn {
            name: "Time".to_string(),
        };
        assert_eq!(e.to_string(), "missing column \"Time\" in dataset");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<DatasetError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<DatasetError>();
    }
}
