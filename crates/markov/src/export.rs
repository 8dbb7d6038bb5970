//! CSV export of transition matrices and life curves.

use std::io::Write;

use crate::curve::LifeCurve;
use crate::error::MarkovError;
use crate::model::MarkovModel;

/// Writes the transition matrix as CSV.
///
/// The header is `Init State,S0,...,S{N-1}` and each row starts with its
/// from-state name.
///
/// # Errors
///
/// Returns [`MarkovError::Io`] if writing fails.
pub fn write_matrix_csv<W: Write>(model: &MarkovModel, writer: W) -> Result<(), MarkovError> {
    let n = model.n_state();
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["Init State".to_string()];
    header.extend((0..n).map(|j| format!("S{j}")));
    csv.write_record(&header)?;

    for (i, row) in model.matrix().rows().into_iter().enumerate() {
        let mut record = vec![format!("S{i}")];
        record.extend(row.iter().map(f64::to_string));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes a life curve as CSV.
///
/// Columns are `Time` followed by `S{k}` for every state from the curve's
/// initial state upwards; lower states are unreachable in a deterioration
/// model and are left out.
///
/// # Errors
///
/// Returns [`MarkovError::Io`] if writing fails.
pub fn write_curve_csv<W: Write>(curve: &LifeCurve, writer: W) -> Result<(), MarkovError> {
    let first = curve.init_state();
    let n = curve.n_state();
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["Time".to_string()];
    header.extend((first..n).map(|k| format!("S{k}")));
    csv.write_record(&header)?;

    for (t, probs) in curve.iter() {
        let mut record = vec![t.to_string()];
        record.extend(probs.iter().skip(first).map(f64::to_string));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_csv_layout() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        let mut buf = Vec::new();
        write_matrix_csv(&model, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Init State,S0,S1\nS0,0.5,0.5\nS1,0,1\n");
    }

    #[test]
    fn curve_csv_skips_lower_states() {
        let model = MarkovModel::monotone(&[0.5, 0.5]).unwrap();
        let curve = model.simulate_curve(1, 0, 2, 1).unwrap();
        let mut buf = Vec::new();
        write_curve_csv(&curve, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Time,S1,S2\n0,1,0\n1,0.5,0.5\n");
    }

    #[test]
    fn empty_curve_has_header_only() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        let curve = model.simulate_curve(0, 3, 3, 1).unwrap();
        let mut buf = Vec::new();
        write_curve_csv(&curve, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Time,S0,S1\n");
    }
}
