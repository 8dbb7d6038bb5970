//! Markov deterioration models.

use deterior_dataset::TimeStateHistogram;
use ndarray::{Array1, Array2};

use crate::curve::LifeCurve;
use crate::error::MarkovError;
use crate::matrix;

/// How a model's transition matrix was specified.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// An explicit row-stochastic matrix.
    General,
    /// A stay-or-advance chain built from `N - 1` advance probabilities.
    ///
    /// State `i < N - 1` stays with probability `1 - p[i]` and moves to
    /// `i + 1` with probability `p[i]`; state `N - 1` is absorbing.
    MonotoneParametric(Vec<f64>),
}

impl Variant {
    /// Returns the variant name used in persisted models.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::General => "General",
            Variant::MonotoneParametric(_) => "MonotoneParametric",
        }
    }
}

/// An immutable discrete-time Markov chain over `N` deterioration states.
///
/// Constructed either from an explicit matrix ([`MarkovModel::general`]) or
/// from advance probabilities ([`MarkovModel::monotone`]); both expose the
/// same simulation API.
///
/// # Example
///
/// ```
/// use deterior_markov::MarkovModel;
///
/// let model = MarkovModel::monotone(&[0.5]).unwrap();
/// let curve = model.simulate_curve(0, 0, 3, 1).unwrap();
/// let p0: Vec<f64> = curve.iter().map(|(_, p)| p[0]).collect();
/// assert_eq!(p0, vec![1.0, 0.5, 0.25]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovModel {
    matrix: Array2<f64>,
    variant: Variant,
}

impl MarkovModel {
    /// Creates a model from an explicit transition matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError`] if the matrix is empty, not square, has an
    /// entry outside `[0, 1]`, or a row whose sum differs from 1 by more
    /// than 1e-6.
    pub fn general(matrix: Array2<f64>) -> Result<Self, MarkovError> {
        matrix::check_stochastic(&matrix)?;
        Ok(Self {
            matrix,
            variant: Variant::General,
        })
    }

    /// Creates a monotone stay-or-advance model from `N - 1` probabilities.
    ///
    /// An empty slice gives a single absorbing state.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidProbability`] if any probability is
    /// non-finite or outside `[0, 1]`.
    pub fn monotone(probs: &[f64]) -> Result<Self, MarkovError> {
        for (i, &p) in probs.iter().enumerate() {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(MarkovError::InvalidProbability {
                    location: format!("p[{i}]"),
                    value: p,
                });
            }
        }
        Ok(Self {
            matrix: monotone_matrix(probs),
            variant: Variant::MonotoneParametric(probs.to_vec()),
        })
    }

    /// Returns the number of states.
    pub fn n_state(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns the transition matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Returns how the model was specified.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Returns the advance probabilities of a monotone model.
    pub fn probabilities(&self) -> Option<&[f64]> {
        match &self.variant {
            Variant::MonotoneParametric(p) => Some(p),
            Variant::General => None,
        }
    }

    /// Returns the `t`-step transition matrix `M^t`.
    pub fn power(&self, t: u32) -> Array2<f64> {
        matrix::power(&self.matrix, t)
    }

    /// Computes the expected end-state counts for a start-state histogram.
    ///
    /// Returns `Σ_t counts_t · M^t` over every elapsed time `t` in the
    /// histogram.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::DimensionMismatch`] if the histogram covers a
    /// different number of states.
    pub fn simulate(&self, histogram: &TimeStateHistogram) -> Result<Array1<f64>, MarkovError> {
        let n = self.n_state();
        if histogram.n_state() != n {
            return Err(MarkovError::DimensionMismatch {
                expected: n,
                got: histogram.n_state(),
            });
        }
        let mut expected = Array1::zeros(n);
        for (t, counts) in histogram.iter() {
            let start = Array1::from_vec(counts.to_vec());
            expected += &start.dot(&self.power(t));
        }
        Ok(expected)
    }

    /// Projects the state distribution of an asset starting in `init_state`.
    ///
    /// Produces one probability vector for each time in
    /// `start, start + step, ...` below `stop`. `M^start` is computed once
    /// and the running matrix is multiplied by `M^step` at each step.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::StateOutOfRange`] if `init_state >= N`, or
    /// [`MarkovError::InvalidCurveRange`] if `step == 0`.
    pub fn simulate_curve(
        &self,
        init_state: usize,
        start: u32,
        stop: u32,
        step: u32,
    ) -> Result<LifeCurve, MarkovError> {
        let n = self.n_state();
        if init_state >= n {
            return Err(MarkovError::StateOutOfRange {
                state: init_state,
                n_state: n,
            });
        }
        if step == 0 {
            return Err(MarkovError::InvalidCurveRange {
                reason: "step must be positive".to_string(),
            });
        }

        let step_matrix = self.power(step);
        let mut running = self.power(start);
        let mut times = Vec::new();
        let mut probabilities = Vec::new();
        let mut t = start;
        while t < stop {
            times.push(t);
            probabilities.push(running.row(init_state).to_owned());
            t = match t.checked_add(step) {
                Some(next) => next,
                None => break,
            };
            if t < stop {
                running = running.dot(&step_matrix);
            }
        }
        Ok(LifeCurve::new(n, init_state, times, probabilities))
    }
}

fn monotone_matrix(probs: &[f64]) -> Array2<f64> {
    let n = probs.len() + 1;
    let mut m = Array2::zeros((n, n));
    for (i, &p) in probs.iter().enumerate() {
        m[[i, i]] = 1.0 - p;
        m[[i, i + 1]] = p;
    }
    m[[n - 1, n - 1]] = 1.0;
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use deterior_dataset::{Histogram, TransitionRecord};
    use ndarray::array;

    #[test]
    fn monotone_matrix_layout() {
        let model = MarkovModel::monotone(&[0.2, 0.3]).unwrap();
        let expected = array![[0.8, 0.2, 0.0], [0.0, 0.7, 0.3], [0.0, 0.0, 1.0]];
        assert_eq!(model.n_state(), 3);
        for (a, b) in model.matrix().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-15);
        }
        assert_eq!(model.probabilities(), Some(&[0.2, 0.3][..]));
        assert_eq!(model.variant().name(), "MonotoneParametric");
    }

    #[test]
    fn monotone_single_state() {
        let model = MarkovModel::monotone(&[]).unwrap();
        assert_eq!(model.n_state(), 1);
        assert_eq!(model.matrix(), &array![[1.0]]);
    }

    #[test]
    fn monotone_rejects_out_of_range() {
        for bad in [-0.1, 1.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                MarkovModel::monotone(&[0.5, bad]),
                Err(MarkovError::InvalidProbability { .. })
            ));
        }
    }

    #[test]
    fn general_accepts_and_rejects() {
        let model = MarkovModel::general(array![[0.9, 0.1], [0.4, 0.6]]).unwrap();
        assert_eq!(model.variant(), &Variant::General);
        assert!(model.probabilities().is_none());

        assert!(MarkovModel::general(array![[0.9, 0.2], [0.4, 0.6]]).is_err());
        assert!(MarkovModel::general(array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).is_err());
    }

    #[test]
    fn general_row_tolerance() {
        let m = array![[0.5, 0.5 + 5e-7], [0.0, 1.0]];
        assert!(MarkovModel::general(m).is_ok());
        let m = array![[0.5, 0.5 + 5e-6], [0.0, 1.0]];
        assert!(MarkovModel::general(m).is_err());
    }

    #[test]
    fn simulate_weights_each_time() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        let records = [
            TransitionRecord::new(0, 0, 1),
            TransitionRecord::new(0, 1, 2),
            TransitionRecord::new(1, 1, 2),
        ];
        let h = Histogram::from_transitions(2, &records).unwrap();
        let expected = model.simulate(h.time_states()).unwrap();
        // t=1: [1,0]·M = [0.5, 0.5]; t=2: [1,1]·M² = [0.25, 1.75]
        assert_abs_diff_eq!(expected[0], 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(expected[1], 2.25, epsilon = 1e-12);
    }

    #[test]
    fn simulate_dimension_mismatch() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        let h = Histogram::from_transitions(3, &[]).unwrap();
        assert!(matches!(
            model.simulate(h.time_states()),
            Err(MarkovError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn curve_rejects_bad_arguments() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        assert!(matches!(
            model.simulate_curve(2, 0, 10, 1),
            Err(MarkovError::StateOutOfRange { .. })
        ));
        assert!(matches!(
            model.simulate_curve(0, 0, 10, 0),
            Err(MarkovError::InvalidCurveRange { .. })
        ));
    }

    #[test]
    fn curve_empty_when_start_not_below_stop() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        assert!(model.simulate_curve(0, 5, 5, 1).unwrap().is_empty());
        assert!(model.simulate_curve(0, 6, 5, 1).unwrap().is_empty());
    }

    #[test]
    fn curve_with_offset_and_step() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        let curve = model.simulate_curve(0, 2, 9, 3).unwrap();
        assert_eq!(curve.times(), &[2, 5, 8]);
        let p0: Vec<f64> = curve.iter().map(|(_, p)| p[0]).collect();
        assert_abs_diff_eq!(p0[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(p0[1], 0.5f64.powi(5), epsilon = 1e-12);
        assert_abs_diff_eq!(p0[2], 0.5f64.powi(8), epsilon = 1e-12);
    }
}
