//! Error types for the deterior-fit crate.

use deterior_markov::MarkovError;

/// Error type for all fallible operations in the deterior-fit crate.
///
/// A search that fails to converge is not an error: it is reported through
/// [`FitResult::success`](crate::FitResult::success).
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    /// Returned when a fit configuration value is out of range.
    #[error("invalid fit configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Returned when the histogram has no states to fit.
    #[error("histogram has no states")]
    NoStates,

    /// Returned when the optimiser backend rejects its setup.
    #[error("optimiser error: {reason}")]
    Optimizer {
        /// Backend error message.
        reason: String,
    },

    /// Propagated model construction failure.
    #[error(transparent)]
    Markov(#[from] MarkovError),
}

impl From<argmin::core::Error> for FitError {
    fn from(e: argmin::core::Error) -> Self {
        FitError::Optimizer {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_config() {
        let e = FitError::InvalidConfig {
            reason: "initial_guess must be in [0, 1], got 2".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid fit configuration: initial_guess must be in [0, 1], got 2"
        );
    }

    #[test]
    fn error_no_states() {
        assert_eq!(FitError::NoStates.to_string(), "histogram has no states");
    }

    #[test]
    fn error_wraps_markov() {
        let e: FitError = MarkovError::EmptyMatrix.into();
        assert_eq!(e.to_string(), "transition matrix is empty");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<FitError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<FitError>();
    }
}
