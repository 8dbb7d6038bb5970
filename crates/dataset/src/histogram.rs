//! Sufficient statistic of a transition set.
//!
//! Fitting and validation never look at individual transitions: the loss
//! only depends on how many transitions started in each state after each
//! distinct elapsed time, and on how many ended in each state. Reducing the
//! records once makes each simulation pass cost
//! `O(distinct elapsed times × N²)` instead of `O(records × N²)`.

use std::collections::BTreeMap;

use crate::error::DatasetError;
use crate::record::TransitionRecord;

/// Elapsed time → start-state count vector.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStateHistogram {
    n_state: usize,
    counts: BTreeMap<u32, Vec<f64>>,
}

impl TimeStateHistogram {
    /// Creates an empty histogram over `n_state` states.
    pub fn new(n_state: usize) -> Self {
        Self {
            n_state,
            counts: BTreeMap::new(),
        }
    }

    /// Returns the number of states (length of every count vector).
    pub fn n_state(&self) -> usize {
        self.n_state
    }

    /// Returns the start-state counts for one elapsed time, if observed.
    pub fn get(&self, elapsed: u32) -> Option<&[f64]> {
        self.counts.get(&elapsed).map(Vec::as_slice)
    }

    /// Iterates `(elapsed, counts)` in ascending elapsed order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[f64])> {
        self.counts.iter().map(|(&t, v)| (t, v.as_slice()))
    }

    /// Returns the number of distinct elapsed times.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no elapsed time has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the largest observed elapsed time.
    pub fn max_elapsed(&self) -> Option<u32> {
        self.counts.keys().next_back().copied()
    }

    fn add(&mut self, elapsed: u32, start: usize) {
        let n = self.n_state;
        self.counts.entry(elapsed).or_insert_with(|| vec![0.0; n])[start] += 1.0;
    }
}

/// End-state count vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalStateHistogram {
    counts: Vec<f64>,
}

impl FinalStateHistogram {
    /// Creates an all-zero histogram over `n_state` states.
    pub fn new(n_state: usize) -> Self {
        Self {
            counts: vec![0.0; n_state],
        }
    }

    /// Returns the per-state counts.
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Returns the total count, equal to the number of transitions.
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }
}

/// The pair of histograms consumed by fitting and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    time_states: TimeStateHistogram,
    final_states: FinalStateHistogram,
}

impl Histogram {
    /// Builds the histogram pair from transition records.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::StateOutOfRange`] if a record refers to a
    /// state `>= n_state`.
    pub fn from_transitions(
        n_state: usize,
        records: &[TransitionRecord],
    ) -> Result<Self, DatasetError> {
        if let Some(index) = records
            .iter()
            .flat_map(|r| [r.start, r.end])
            .find(|&i| i >= n_state)
        {
            return Err(DatasetError::StateOutOfRange { index, n_state });
        }
        Ok(Self::from_valid_transitions(n_state, records))
    }

    /// Builds the histogram pair from records already known to be in range.
    pub(crate) fn from_valid_transitions(n_state: usize, records: &[TransitionRecord]) -> Self {
        let mut time_states = TimeStateHistogram::new(n_state);
        let mut final_states = FinalStateHistogram::new(n_state);
        for r in records {
            time_states.add(r.elapsed, r.start);
            final_states.counts[r.end] += 1.0;
        }
        Self {
            time_states,
            final_states,
        }
    }

    /// Returns the number of states.
    pub fn n_state(&self) -> usize {
        self.time_states.n_state()
    }

    /// Returns the elapsed-time → start-state histogram.
    pub fn time_states(&self) -> &TimeStateHistogram {
        &self.time_states
    }

    /// Returns the end-state histogram.
    pub fn final_states(&self) -> &FinalStateHistogram {
        &self.final_states
    }
}
