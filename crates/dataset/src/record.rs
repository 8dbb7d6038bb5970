//! Inspection rows and the transitions inferred from them.

use chrono::NaiveDateTime;

use crate::error::DatasetError;
use crate::histogram::Histogram;

/// One observed reading of an asset.
///
/// `state` and `timestamp` are `None` when the source cell was blank; such
/// rows are skipped during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionRecord {
    asset_id: String,
    state: Option<String>,
    timestamp: Option<NaiveDateTime>,
}

impl InspectionRecord {
    /// Creates a new inspection record.
    ///
    /// Blank (whitespace-only) state labels are normalised to `None`.
    pub fn new(
        asset_id: impl Into<String>,
        state: Option<String>,
        timestamp: Option<NaiveDateTime>,
    ) -> Self {
        let state = state.filter(|s| !s.trim().is_empty());
        Self {
            asset_id: asset_id.into(),
            state,
            timestamp,
        }
    }

    /// Returns the asset id.
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Returns the state label, if present.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Returns the inspection timestamp, if present.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }
}

/// One inferred state change of a single asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionRecord {
    /// State index at the earlier inspection.
    pub start: usize,
    /// State index at the later inspection.
    pub end: usize,
    /// Elapsed time between the inspections, in configured units (> 0).
    pub elapsed: u32,
}

impl TransitionRecord {
    /// Creates a new transition record.
    pub fn new(start: usize, end: usize, elapsed: u32) -> Self {
        Self {
            start,
            end,
            elapsed,
        }
    }
}

/// Transitions together with the number of states they were inferred with.
///
/// The state count travels with the records because a subset (a
/// cross-validation fold, say) may not mention every state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSet {
    n_state: usize,
    records: Vec<TransitionRecord>,
}

impl TransitionSet {
    /// Creates a transition set, checking every index against `n_state`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::StateOutOfRange`] if any start or end index
    /// is `>= n_state`.
    pub fn new(n_state: usize, records: Vec<TransitionRecord>) -> Result<Self, DatasetError> {
        for r in &records {
            for index in [r.start, r.end] {
                if index >= n_state {
                    return Err(DatasetError::StateOutOfRange { index, n_state });
                }
            }
        }
        Ok(Self { n_state, records })
    }

    /// Returns the number of states.
    pub fn n_state(&self) -> usize {
        self.n_state
    }

    /// Returns the transition records.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no transitions.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds a new set over the same states from a subset of records.
    ///
    /// The records must come from this set (or another set with the same
    /// state count); indices are not re-checked.
    pub fn with_records(&self, records: Vec<TransitionRecord>) -> Self {
        Self {
            n_state: self.n_state,
            records,
        }
    }

    /// Reduces the transitions to their sufficient statistic.
    pub fn histogram(&self) -> Histogram {
        Histogram::from_valid_transitions(self.n_state, &self.records)
    }

    /// Splits the set into consecutive folds of `ceil(len / k)` records.
    ///
    /// The last fold may be smaller, and fewer than `k` folds are produced
    /// when there are too few records. An empty set or `k == 0` yields no
    /// folds.
    pub fn chunk_folds(&self, k: usize) -> Vec<TransitionSet> {
        if k == 0 || self.records.is_empty() {
            return Vec::new();
        }
        let size = self.records.len().div_ceil(k);
        self.records
            .chunks(size)
            .map(|c| self.with_records(c.to_vec()))
            .collect()
    }

    /// Consumes the set and returns its records.
    pub fn into_records(self) -> Vec<TransitionRecord> {
        self.records
    }
}
