//! Scoring a model against held-out transitions.

use deterior_dataset::TransitionSet;
use deterior_markov::MarkovModel;
use ndarray::Array1;
use tracing::debug;

use crate::error::EvaluateError;

/// Agreement between simulated and observed end-state counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Simulated end-state counts.
    pub expected: Array1<f64>,
    /// Observed end-state counts.
    pub actual: Array1<f64>,
    /// `Σ (actual − expected)²`.
    pub variance: f64,
    /// `√variance`.
    pub std_dev: f64,
    /// `std_dev / Σ expected × 100`.
    pub error_pct: f64,
}

/// Validates `model` against `data`.
///
/// # Errors
///
/// Returns [`EvaluateError::DimensionMismatch`] if the model and the data
/// have different state counts, checked before anything is computed, and
/// [`EvaluateError::EmptyData`] if `data` has no transitions.
///
/// # Example
///
/// ```
/// use deterior_dataset::{TransitionRecord, TransitionSet};
/// use deterior_evaluate::validate;
/// use deterior_markov::MarkovModel;
///
/// let model = MarkovModel::monotone(&[0.5]).unwrap();
/// let data = TransitionSet::new(2, vec![
///     TransitionRecord::new(0, 0, 1),
///     TransitionRecord::new(0, 1, 1),
/// ]).unwrap();
///
/// let result = validate(&model, &data).unwrap();
/// assert_eq!(result.variance, 0.0);
/// ```
pub fn validate(model: &MarkovModel, data: &TransitionSet) -> Result<ValidationResult, EvaluateError> {
    if model.n_state() != data.n_state() {
        return Err(EvaluateError::DimensionMismatch {
            model: model.n_state(),
            data: data.n_state(),
        });
    }
    if data.is_empty() {
        return Err(EvaluateError::EmptyData);
    }

    let histogram = data.histogram();
    let expected = model.simulate(histogram.time_states())?;
    let actual = Array1::from_vec(histogram.final_states().counts().to_vec());

    let variance = (&actual - &expected).mapv(|d| d * d).sum();
    let std_dev = variance.sqrt();
    let error_pct = std_dev / expected.sum() * 100.0;
    debug!(records = data.len(), variance, error_pct, "validated model");

    Ok(ValidationResult {
        expected,
        actual,
        variance,
        std_dev,
        error_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use deterior_dataset::TransitionRecord;

    #[test]
    fn scores_mismatch() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        let data = TransitionSet::new(
            2,
            vec![
                TransitionRecord::new(0, 1, 1),
                TransitionRecord::new(0, 1, 1),
                TransitionRecord::new(0, 1, 1),
                TransitionRecord::new(0, 1, 1),
            ],
        )
        .unwrap();

        let r = validate(&model, &data).unwrap();
        assert_eq!(r.expected.to_vec(), vec![2.0, 2.0]);
        assert_eq!(r.actual.to_vec(), vec![0.0, 4.0]);
        assert_abs_diff_eq!(r.variance, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.std_dev, 8.0f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(r.error_pct, 8.0f64.sqrt() / 4.0 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn dimension_checked_first() {
        let model = MarkovModel::monotone(&[0.5, 0.5]).unwrap();
        let data = TransitionSet::new(2, Vec::new()).unwrap();
        assert!(matches!(
            validate(&model, &data),
            Err(EvaluateError::DimensionMismatch { model: 3, data: 2 })
        ));
    }

    #[test]
    fn empty_data_rejected() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        let data = TransitionSet::new(2, Vec::new()).unwrap();
        assert!(matches!(validate(&model, &data), Err(EvaluateError::EmptyData)));
    }
}
