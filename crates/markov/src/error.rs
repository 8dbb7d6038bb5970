//! Error types for the deterior-markov crate.

/// Error type for all fallible operations in the deterior-markov crate.
#[derive(Debug, thiserror::Error)]
pub enum MarkovError {
    /// Returned when a model would have no states.
    #[error("transition matrix is empty")]
    EmptyMatrix,

    /// Returned when a transition matrix is not square.
    #[error("transition matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Returned when a probability is non-finite or outside `[0, 1]`.
    #[error("invalid probability at {location}: {value} (must be finite and in [0, 1])")]
    InvalidProbability {
        /// Where the value was found, e.g. `"p[2]"` or `"matrix[0][1]"`.
        location: String,
        /// The invalid value.
        value: f64,
    },

    /// Returned when a matrix row does not sum to one.
    #[error("row {row} sums to {sum}, expected 1 (tolerance 1e-6)")]
    RowSum {
        /// Row index.
        row: usize,
        /// Actual row sum.
        sum: f64,
    },

    /// Returned when input dimensions do not match the model.
    #[error("dimension mismatch: model has {expected} states, input has {got}")]
    DimensionMismatch {
        /// Number of model states.
        expected: usize,
        /// Dimension of the input.
        got: usize,
    },

    /// Returned when a state index is outside the model.
    #[error("state {state} out of range for {n_state}-state model")]
    StateOutOfRange {
        /// The requested state.
        state: usize,
        /// Number of model states.
        n_state: usize,
    },

    /// Returned when a life-curve time range is unusable.
    #[error("invalid curve range: {reason}")]
    InvalidCurveRange {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a persisted sparse entry points outside the matrix.
    #[error("matrix entry ({row}, {col}) out of range for {n_state} states")]
    InvalidEntry {
        /// Entry row.
        row: usize,
        /// Entry column.
        col: usize,
        /// Declared number of states.
        n_state: usize,
    },

    /// Returned when a persisted model cannot describe its declared size.
    #[error("model declares {n_state} states but {reason}")]
    InvalidSize {
        /// Declared number of states.
        n_state: usize,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a model tagged monotone-parametric has another shape.
    #[error("matrix is not a monotone stay-or-advance chain: {reason}")]
    NotMonotone {
        /// Description of the offending entry.
        reason: String,
    },

    /// Wraps an error from JSON (de)serialisation.
    #[error("model serialisation error: {reason}")]
    Serialization {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an I/O error while reading or writing a model.
    #[error("i/o error: {reason}")]
    Io {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<serde_json::Error> for MarkovError {
    fn from(e: serde_json::Error) -> Self {
        MarkovError::Serialization {
            reason: e.to_string(),
        }
    }
}

impl From<std::io::Error> for MarkovError {
    fn from(e: std::io::Error) -> Self {
        MarkovError::Io {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for MarkovError {
    fn from(e: csv::Error) -> Self {
        MarkovError::Io {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_not_square() {
        let e = MarkovError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(e.to_string(), "transition matrix must be square, got 2x3");
    }

    #[test]
    fn error_row_sum() {
        let e = MarkovError::RowSum { row: 1, sum: 1.5 };
        assert_eq!(
            e.to_string(),
            "row 1 sums to 1.5, expected 1 (tolerance 1e-6)"
        );
    }

    #[test]
    fn error_invalid_probability() {
        let e = MarkovError::InvalidProbability {
            location: "p[0]".to_string(),
            value: -0.5,
        };
        assert_eq!(
            e.to_string(),
            "invalid probability at p[0]: -0.5 (must be finite and in [0, 1])"
        );
    }

    #[test]
    fn error_dimension_mismatch() {
        let e = MarkovError::DimensionMismatch {
            expected: 4,
            got: 3,
        };
        assert_eq!(
            e.to_string(),
            "dimension mismatch: model has 4 states, input has 3"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<MarkovError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<MarkovError>();
    }
}
