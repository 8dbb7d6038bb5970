//! JSON persistence of Markov models.
//!
//! The transition matrix is stored sparsely as `(row, col, probability)`
//! triples in row-major order, one per strictly positive entry. Missing
//! entries load as zero.
//!
//! ```json
//! {
//!   "n_state": 2,
//!   "transition_matrix": [
//!     { "row": 0, "col": 0, "probability": 0.8 },
//!     { "row": 0, "col": 1, "probability": 0.2 },
//!     { "row": 1, "col": 1, "probability": 1.0 }
//!   ],
//!   "metadata": {
//!     "note": "Model dumped by deterior v0.1.0",
//!     "saved_at": "2024-01-01T00:00:00Z",
//!     "variant": "MonotoneParametric"
//!   }
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MarkovError;
use crate::model::{MarkovModel, Variant};

/// Tolerance for recognising a stored matrix as monotone-parametric.
const MONOTONE_TOLERANCE: f64 = 1e-9;

/// Variant tag stored in model metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantTag {
    /// Explicit matrix.
    General,
    /// Stay-or-advance chain.
    MonotoneParametric,
}

/// One strictly positive matrix entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry {
    /// Row (from-state) index.
    pub row: usize,
    /// Column (to-state) index.
    pub col: usize,
    /// Transition probability.
    pub probability: f64,
}

/// Descriptive information stored alongside the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Free-form note, typically naming the producing tool.
    pub note: String,
    /// When the model was saved.
    pub saved_at: DateTime<Utc>,
    /// How the matrix was specified.
    pub variant: VariantTag,
}

/// Caller-supplied metadata for [`ModelFile::from_model`].
///
/// The save time is passed in rather than read from the clock so that
/// serialisation stays a pure function.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    /// Free-form note.
    pub note: String,
    /// Save timestamp.
    pub saved_at: DateTime<Utc>,
}

impl SaveInfo {
    /// Creates save metadata.
    pub fn new(note: impl Into<String>, saved_at: DateTime<Utc>) -> Self {
        Self {
            note: note.into(),
            saved_at,
        }
    }
}

/// The persisted form of a [`MarkovModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    /// Number of states.
    pub n_state: usize,
    /// Strictly positive entries in row-major order.
    pub transition_matrix: Vec<MatrixEntry>,
    /// Descriptive metadata.
    pub metadata: ModelMetadata,
}

impl ModelFile {
    /// Captures a model for persistence.
    pub fn from_model(model: &MarkovModel, info: SaveInfo) -> Self {
        let transition_matrix = model
            .matrix()
            .indexed_iter()
            .filter(|&(_, &p)| p > 0.0)
            .map(|((row, col), &probability)| MatrixEntry {
                row,
                col,
                probability,
            })
            .collect();
        let variant = match model.variant() {
            Variant::General => VariantTag::General,
            Variant::MonotoneParametric(_) => VariantTag::MonotoneParametric,
        };
        Self {
            n_state: model.n_state(),
            transition_matrix,
            metadata: ModelMetadata {
                note: info.note,
                saved_at: info.saved_at,
                variant,
            },
        }
    }

    /// Rebuilds the model.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidSize`] if the declared state count
    /// cannot be backed by the stored entries, checked before any matrix is
    /// allocated, [`MarkovError::InvalidEntry`] for an entry outside the
    /// declared size, any validation error of [`MarkovModel::general`], or
    /// [`MarkovError::NotMonotone`] if the file is tagged
    /// monotone-parametric but the matrix is not a stay-or-advance chain.
    pub fn into_model(&self) -> Result<MarkovModel, MarkovError> {
        let n = self.n_state;
        check_size(n, self.transition_matrix.len())?;
        let mut matrix = Array2::zeros((n, n));
        for e in &self.transition_matrix {
            if e.row >= n || e.col >= n {
                return Err(MarkovError::InvalidEntry {
                    row: e.row,
                    col: e.col,
                    n_state: n,
                });
            }
            matrix[[e.row, e.col]] = e.probability;
        }

        match self.metadata.variant {
            VariantTag::General => MarkovModel::general(matrix),
            VariantTag::MonotoneParametric => monotone_from_matrix(&matrix),
        }
    }

    /// Serialises to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, MarkovError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::Serialization`] on malformed JSON or a schema
    /// mismatch.
    pub fn from_json(text: &str) -> Result<Self, MarkovError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Writes pretty-printed JSON to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError`] if encoding or writing fails.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), MarkovError> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Reads JSON from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError`] if reading or decoding fails.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, MarkovError> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }
}

/// Every row of a stochastic matrix has a positive entry, so a file with
/// fewer entries than states is corrupt.
fn check_size(n: usize, entries: usize) -> Result<(), MarkovError> {
    let invalid = |reason: String| MarkovError::InvalidSize { n_state: n, reason };
    if entries < n {
        return Err(invalid(format!("stores only {entries} matrix entries")));
    }
    let cells = n
        .checked_mul(n)
        .filter(|c| c.checked_mul(size_of::<f64>()).is_some_and(|b| b <= isize::MAX as usize))
        .ok_or_else(|| invalid("the matrix does not fit in memory".to_string()))?;
    debug!(n_state = n, cells, "allocating transition matrix");
    Ok(())
}

/// Saves a model as JSON at `path`.
///
/// # Errors
///
/// Returns [`MarkovError`] if the file cannot be created or written.
pub fn save_model(path: &Path, model: &MarkovModel, info: SaveInfo) -> Result<(), MarkovError> {
    debug!(path = %path.display(), n_state = model.n_state(), "saving model");
    let file = File::create(path)?;
    ModelFile::from_model(model, info).write_json(file)
}

/// Loads a model from a JSON file at `path`.
///
/// # Errors
///
/// Returns [`MarkovError`] if the file cannot be read or does not describe
/// a valid model.
pub fn load_model(path: &Path) -> Result<MarkovModel, MarkovError> {
    let file = File::open(path)?;
    let model = ModelFile::read_json(file)?.into_model()?;
    debug!(
        path = %path.display(),
        n_state = model.n_state(),
        variant = model.variant().name(),
        "loaded model"
    );
    Ok(model)
}

fn monotone_from_matrix(matrix: &Array2<f64>) -> Result<MarkovModel, MarkovError> {
    let n = matrix.nrows();
    if n == 0 {
        return Err(MarkovError::EmptyMatrix);
    }
    let probs: Vec<f64> = (0..n - 1).map(|i| matrix[[i, i + 1]]).collect();
    let model = MarkovModel::monotone(&probs)?;
    for ((i, j), &stored) in matrix.indexed_iter() {
        let rebuilt = model.matrix()[[i, j]];
        if (stored - rebuilt).abs() > MONOTONE_TOLERANCE {
            return Err(MarkovError::NotMonotone {
                reason: format!("entry ({i}, {j}) is {stored}, expected {rebuilt}"),
            });
        }
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::array;

    fn info() -> SaveInfo {
        SaveInfo::new(
            "test",
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn sparse_entries_row_major() {
        let model = MarkovModel::monotone(&[0.25, 1.0]).unwrap();
        let file = ModelFile::from_model(&model, info());
        let triples: Vec<(usize, usize, f64)> = file
            .transition_matrix
            .iter()
            .map(|e| (e.row, e.col, e.probability))
            .collect();
        assert_eq!(
            triples,
            vec![(0, 0, 0.75), (0, 1, 0.25), (1, 2, 1.0), (2, 2, 1.0)]
        );
        assert_eq!(file.metadata.variant, VariantTag::MonotoneParametric);
    }

    #[test]
    fn oversized_state_count_rejected_before_allocation() {
        let json = r#"{
            "n_state": 4294967296,
            "transition_matrix": [],
            "metadata": {
                "note": "corrupt",
                "saved_at": "2024-01-01T00:00:00Z",
                "variant": "General"
            }
        }"#;
        let file = ModelFile::from_json(json).unwrap();
        assert!(matches!(
            file.into_model(),
            Err(MarkovError::InvalidSize { n_state: 4294967296, .. })
        ));
    }

    #[test]
    fn unrepresentable_matrix_rejected() {
        let entries = 3;
        assert!(check_size(usize::MAX, usize::MAX).is_err());
        assert!(check_size(4, entries).is_err());
        assert!(check_size(3, entries).is_ok());
    }

    #[test]
    fn json_contains_schema_fields() {
        let model = MarkovModel::general(array![[0.5, 0.5], [0.0, 1.0]]).unwrap();
        let json = ModelFile::from_model(&model, info()).to_json().unwrap();
        assert!(json.contains("\"n_state\": 2"));
        assert!(json.contains("\"transition_matrix\""));
        assert!(json.contains("\"variant\": \"General\""));
        assert!(json.contains("\"saved_at\": \"2024-05-01T12:00:00Z\""));
    }

    #[test]
    fn monotone_tag_restores_probabilities() {
        let model = MarkovModel::monotone(&[0.2, 0.3]).unwrap();
        let json = ModelFile::from_model(&model, info()).to_json().unwrap();
        let loaded = ModelFile::from_json(&json).unwrap().into_model().unwrap();
        assert_eq!(loaded.probabilities(), Some(&[0.2, 0.3][..]));
    }

    #[test]
    fn monotone_tag_on_general_matrix_rejected() {
        let model = MarkovModel::general(array![[0.5, 0.5], [0.5, 0.5]]).unwrap();
        let mut file = ModelFile::from_model(&model, info());
        file.metadata.variant = VariantTag::MonotoneParametric;
        assert!(matches!(
            file.into_model(),
            Err(MarkovError::NotMonotone { .. })
        ));
    }

    #[test]
    fn entry_out_of_range_rejected() {
        let model = MarkovModel::monotone(&[0.5]).unwrap();
        let mut file = ModelFile::from_model(&model, info());
        file.transition_matrix.push(MatrixEntry {
            row: 0,
            col: 5,
            probability: 0.0,
        });
        assert!(matches!(
            file.into_model(),
            Err(MarkovError::InvalidEntry { col: 5, .. })
        ));
    }

    #[test]
    fn missing_entries_fail_row_sum() {
        let json = r#"{
            "n_state": 2,
            "transition_matrix": [{ "row": 1, "col": 1, "probability": 1.0 }],
            "metadata": { "note": "", "saved_at": "2024-01-01T00:00:00Z", "variant": "General" }
        }"#;
        let file = ModelFile::from_json(json).unwrap();
        assert!(matches!(
            file.into_model(),
            Err(MarkovError::RowSum { row: 0, .. })
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            ModelFile::from_json("{ not json"),
            Err(MarkovError::Serialization { .. })
        ));
    }
}
