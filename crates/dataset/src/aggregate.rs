//! Inspection rows → ordered transition records.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::error::DatasetError;
use crate::record::{InspectionRecord, TransitionRecord, TransitionSet};
use crate::state_map::StateMap;
use crate::time_unit::TimeUnit;

/// Why an inspection row was left out of the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The state cell was blank.
    BlankState,
    /// The timestamp cell was blank.
    BlankTimestamp,
}

/// A row that was dropped without aborting the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based row number as supplied to [`aggregate`].
    pub row: usize,
    /// Asset id of the row.
    pub asset_id: String,
    /// Why the row was dropped.
    pub reason: SkipReason,
}

/// Output of [`aggregate`].
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Label → index mapping of every state seen in a retained row.
    pub state_map: StateMap,
    /// Inferred transitions over `state_map.len()` states.
    pub transitions: TransitionSet,
    /// Rows dropped because of a blank state or timestamp.
    pub skipped: Vec<SkippedRow>,
    /// Number of retained inspections.
    pub n_inspections: usize,
}

impl Aggregation {
    /// Returns the number of states.
    pub fn n_state(&self) -> usize {
        self.state_map.len()
    }
}

/// Converts per-asset inspection rows into transition records.
///
/// Rows are numbered from `first_row` in iteration order (pass 2 when row 1
/// is a CSV header). For every asset, inspections are stably sorted by
/// timestamp and each consecutive pair becomes one transition whose elapsed
/// time is the day difference converted with `unit`. Pairs whose elapsed
/// time rounds to zero or less are dropped; the following pairs of the same
/// asset are still considered.
///
/// # Errors
///
/// Returns [`DatasetError::BlankAssetId`] on the first row whose asset id
/// is empty.
pub fn aggregate<I>(rows: I, unit: TimeUnit, first_row: usize) -> Result<Aggregation, DatasetError>
where
    I: IntoIterator<Item = InspectionRecord>,
{
    let mut skipped = Vec::new();
    let mut by_asset: BTreeMap<String, Vec<(String, NaiveDateTime)>> = BTreeMap::new();
    let mut n_inspections = 0;

    for (i, record) in rows.into_iter().enumerate() {
        let row = first_row + i;
        if record.asset_id().trim().is_empty() {
            return Err(DatasetError::BlankAssetId { row });
        }
        let reason = match (record.state(), record.timestamp()) {
            (Some(state), Some(ts)) => {
                by_asset
                    .entry(record.asset_id().to_string())
                    .or_default()
                    .push((state.to_string(), ts));
                n_inspections += 1;
                continue;
            }
            (None, _) => SkipReason::BlankState,
            (Some(_), None) => SkipReason::BlankTimestamp,
        };
        warn!(
            row,
            asset = record.asset_id(),
            ?reason,
            "blank state or time, row ignored"
        );
        skipped.push(SkippedRow {
            row,
            asset_id: record.asset_id().to_string(),
            reason,
        });
    }
    info!(n_inspections, n_skipped = skipped.len(), "inspections loaded");

    let state_map = StateMap::from_labels(
        by_asset
            .values()
            .flat_map(|v| v.iter().map(|(s, _)| s.as_str())),
    );
    for (index, label) in state_map.iter() {
        if label != index.to_string() {
            info!(label, index, "mapping state label to S{index}");
        }
    }
    info!(n_state = state_map.len(), "states found");

    let mut records = Vec::new();
    for (asset, inspections) in by_asset.iter_mut() {
        if inspections.len() < 2 {
            continue;
        }
        inspections.sort_by_key(|&(_, ts)| ts);
        for pair in inspections.windows(2) {
            let (s0, t0) = &pair[0];
            let (s1, t1) = &pair[1];
            let days = (*t1 - *t0).num_days();
            let elapsed = unit.elapsed_units(days);
            if elapsed <= 0 {
                debug!(asset = %asset, days, "non-increasing inspection pair dropped");
                continue;
            }
            let (Some(start), Some(end)) = (state_map.index_of(s0), state_map.index_of(s1)) else {
                continue;
            };
            records.push(TransitionRecord::new(start, end, elapsed_steps(asset, elapsed)?));
        }
    }

    let transitions = TransitionSet::new(state_map.len(), records)?;
    Ok(Aggregation {
        state_map,
        transitions,
        skipped,
        n_inspections,
    })
}

/// Narrows a positive elapsed-unit count to the histogram's key type.
fn elapsed_steps(asset: &str, elapsed: i64) -> Result<u32, DatasetError> {
    u32::try_from(elapsed).map_err(|_| DatasetError::ElapsedOutOfRange {
        asset: asset.to_string(),
        elapsed,
    })
}
