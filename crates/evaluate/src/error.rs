//! Error types for the deterior-evaluate crate.

use deterior_fit::FitError;
use deterior_markov::MarkovError;

/// Error type for all fallible operations in the deterior-evaluate crate.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    /// Returned when the model and the dataset disagree on the state count.
    #[error("dimension mismatch: model has {model} states, dataset has {data}")]
    DimensionMismatch {
        /// Number of model states.
        model: usize,
        /// Number of dataset states.
        data: usize,
    },

    /// Returned when there are no transitions to score.
    #[error("no transitions to evaluate")]
    EmptyData,

    /// Returned when the requested fold count is below 2.
    #[error("cross-validation needs at least 2 folds, got {k}")]
    InvalidFolds {
        /// Requested fold count.
        k: usize,
    },

    /// Returned when fitting one cross-validation fold does not converge.
    #[error("fit failed on fold {fold}: {message}")]
    FitFailed {
        /// Zero-based fold index.
        fold: usize,
        /// Optimiser message.
        message: String,
    },

    /// Propagated fitting error.
    #[error(transparent)]
    Fit(#[from] FitError),

    /// Propagated model error.
    #[error(transparent)]
    Markov(#[from] MarkovError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_dimension_mismatch() {
        let e = EvaluateError::DimensionMismatch { model: 3, data: 4 };
        assert_eq!(
            e.to_string(),
            "dimension mismatch: model has 3 states, dataset has 4"
        );
    }

    #[test]
    fn error_fit_failed() {
        let e = EvaluateError::FitFailed {
            fold: 2,
            message: "maximum number of generations (1) reached".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "fit failed on fold 2: maximum number of generations (1) reached"
        );
    }

    #[test]
    fn error_invalid_folds() {
        let e = EvaluateError::InvalidFolds { k: 1 };
        assert_eq!(e.to_string(), "cross-validation needs at least 2 folds, got 1");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<EvaluateError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<EvaluateError>();
    }
}
