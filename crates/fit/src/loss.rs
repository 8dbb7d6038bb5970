//! Least-squares loss for monotone models.

use deterior_dataset::Histogram;
use deterior_markov::MarkovModel;
use ndarray::Array1;

/// Squared error between observed and simulated end-state counts.
///
/// `loss(p) = Σ (final − monotone(clamp(p)).simulate(time))²`, with every
/// parameter clamped into `[0, 1]` before the model is built. Evaluation
/// only reads the histogram, so one `MonotoneLoss` can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct MonotoneLoss<'a> {
    histogram: &'a Histogram,
    observed: Array1<f64>,
}

impl<'a> MonotoneLoss<'a> {
    /// Creates the loss for a histogram.
    pub fn new(histogram: &'a Histogram) -> Self {
        Self {
            histogram,
            observed: Array1::from_vec(histogram.final_states().counts().to_vec()),
        }
    }

    /// Returns the number of free parameters (`N - 1`).
    pub fn n_params(&self) -> usize {
        self.histogram.n_state().saturating_sub(1)
    }

    /// Evaluates the loss at `params`.
    ///
    /// Returns `f64::MAX` if the model cannot be simulated.
    pub fn evaluate(&self, params: &[f64]) -> f64 {
        let clamped = clamp_unit(params);
        let Ok(model) = MarkovModel::monotone(&clamped) else {
            return f64::MAX;
        };
        match model.simulate(self.histogram.time_states()) {
            Ok(expected) => {
                let loss = (&self.observed - &expected).mapv(|d| d * d).sum();
                if loss.is_finite() { loss } else { f64::MAX }
            }
            Err(_) => f64::MAX,
        }
    }
}

/// Clamps every parameter into `[0, 1]`; NaN maps to 0.
pub(crate) fn clamp_unit(params: &[f64]) -> Vec<f64> {
    params
        .iter()
        .map(|&p| if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) })
        .collect()
}
