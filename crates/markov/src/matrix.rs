//! Square-matrix helpers for transition matrices.
//!
//! **Not part of the public API.**

use ndarray::Array2;

/// Raises a square matrix to a non-negative integer power.
///
/// Uses repeated squaring, so `O(log t)` matrix products are needed.
/// `t == 0` returns the identity.
pub(crate) fn power(m: &Array2<f64>, mut t: u32) -> Array2<f64> {
    let n = m.nrows();
    let mut result = Array2::eye(n);
    let mut base = m.clone();
    while t > 0 {
        if t & 1 == 1 {
            result = result.dot(&base);
        }
        t >>= 1;
        if t > 0 {
            base = base.dot(&base);
        }
    }
    result
}

/// Checks that `m` is square and row-stochastic.
///
/// Returns the first offending `(row, sum)` or entry, in row-major order.
pub(crate) fn check_stochastic(m: &Array2<f64>) -> Result<(), crate::MarkovError> {
    use crate::MarkovError;

    let (rows, cols) = m.dim();
    if rows == 0 || cols == 0 {
        return Err(MarkovError::EmptyMatrix);
    }
    if rows != cols {
        return Err(MarkovError::NotSquare { rows, cols });
    }
    for (i, row) in m.rows().into_iter().enumerate() {
        for (j, &p) in row.iter().enumerate() {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(MarkovError::InvalidProbability {
                    location: format!("matrix[{i}][{j}]"),
                    value: p,
                });
            }
        }
        let sum = row.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(MarkovError::RowSum { row: i, sum });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn naive_power(m: &Array2<f64>, t: u32) -> Array2<f64> {
        let mut out = Array2::eye(m.nrows());
        for _ in 0..t {
            out = out.dot(m);
        }
        out
    }

    #[test]
    fn power_zero_is_identity() {
        let m = array![[0.5, 0.5], [0.2, 0.8]];
        assert_eq!(power(&m, 0), Array2::<f64>::eye(2));
    }

    #[test]
    fn power_matches_naive() {
        let m = array![[0.7, 0.2, 0.1], [0.0, 0.9, 0.1], [0.3, 0.0, 0.7]];
        for t in [1, 2, 3, 7, 16, 33] {
            let fast = power(&m, t);
            let slow = naive_power(&m, t);
            for (a, b) in fast.iter().zip(slow.iter()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn check_accepts_stochastic() {
        let m = array![[0.5, 0.5], [0.0, 1.0]];
        assert!(check_stochastic(&m).is_ok());
    }

    #[test]
    fn check_rejects_bad_rows() {
        let m = array![[0.5, 0.6], [0.0, 1.0]];
        assert!(matches!(
            check_stochastic(&m),
            Err(crate::MarkovError::RowSum { row: 0, .. })
        ));
        let m = array![[1.5, -0.5], [0.0, 1.0]];
        assert!(matches!(
            check_stochastic(&m),
            Err(crate::MarkovError::InvalidProbability { .. })
        ));
        let m = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            check_stochastic(&m),
            Err(crate::MarkovError::NotSquare { rows: 2, cols: 3 })
        ));
        let m = Array2::<f64>::zeros((0, 0));
        assert!(matches!(
            check_stochastic(&m),
            Err(crate::MarkovError::EmptyMatrix)
        ));
    }
}
