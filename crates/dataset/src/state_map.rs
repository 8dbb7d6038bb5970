//! Bijection between state labels and contiguous state indices.

use std::collections::BTreeSet;

/// Sorted distinct state labels mapped to `0..N`.
///
/// Labels are ordered lexicographically, so a dataset using `"0"`, `"1"`,
/// `"2"` keeps its numbering, while `"A"`, `"B"` become `0`, `1`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateMap {
    labels: Vec<String>,
}

impl StateMap {
    /// Builds the map from any collection of labels; duplicates collapse.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self {
            labels: set.into_iter().collect(),
        }
    }

    /// Returns the number of states.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no labels were seen.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the index of `label`, if known.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|l| l.as_str().cmp(label))
            .ok()
    }

    /// Returns the label of state `index`, if in range.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Returns all labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterates `(index, label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(String::as_str).enumerate()
    }
}
