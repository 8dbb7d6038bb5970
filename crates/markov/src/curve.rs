//! Life-curve projections.

use ndarray::Array1;

/// State probabilities of one asset at a sequence of times.
///
/// Produced by [`MarkovModel::simulate_curve`](crate::MarkovModel::simulate_curve).
/// Points are ordered by time; calling `simulate_curve` again with the
/// same arguments reproduces the same curve.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeCurve {
    n_state: usize,
    init_state: usize,
    times: Vec<u32>,
    probabilities: Vec<Array1<f64>>,
}

impl LifeCurve {
    pub(crate) fn new(
        n_state: usize,
        init_state: usize,
        times: Vec<u32>,
        probabilities: Vec<Array1<f64>>,
    ) -> Self {
        debug_assert_eq!(times.len(), probabilities.len());
        Self {
            n_state,
            init_state,
            times,
            probabilities,
        }
    }

    /// Returns the number of model states.
    pub fn n_state(&self) -> usize {
        self.n_state
    }

    /// Returns the state the projection started from.
    pub fn init_state(&self) -> usize {
        self.init_state
    }

    /// Returns the projection times.
    pub fn times(&self) -> &[u32] {
        &self.times
    }

    /// Returns the probability vectors, one per time.
    pub fn probabilities(&self) -> &[Array1<f64>] {
        &self.probabilities
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` if the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterates `(time, probabilities)` in time order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Array1<f64>)> {
        self.times.iter().copied().zip(self.probabilities.iter())
    }

    /// Returns the probability of `state` at every point.
    pub fn state_series(&self, state: usize) -> Vec<f64> {
        self.probabilities
            .iter()
            .map(|p| p.get(state).copied().unwrap_or(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn accessors() {
        let curve = LifeCurve::new(
            2,
            0,
            vec![0, 1],
            vec![array![1.0, 0.0], array![0.6, 0.4]],
        );
        assert_eq!(curve.len(), 2);
        assert_eq!(curve.init_state(), 0);
        assert_eq!(curve.state_series(1), vec![0.0, 0.4]);
        assert_eq!(curve.state_series(5), vec![0.0, 0.0]);
        let times: Vec<u32> = curve.iter().map(|(t, _)| t).collect();
        assert_eq!(times, vec![0, 1]);
    }
}
