//! Row compaction: sparse lane numbers to dense, consecutive render rows.

use serde::Serialize;
use std::collections::BTreeMap;
use tideline_core::LaneAssignment;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowMap {
    rows: BTreeMap<usize, usize>,
}

impl RowMap {
    pub fn row_of(&self, lane: usize) -> Option<usize> {
        self.rows.get(&lane).copied()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(lane, row)` pairs in lane order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().map(|(&lane, &row)| (lane, row))
    }

    /// Rewrites each assignment's lane to its row; lanes not in the map are left alone.
    pub fn apply(&self, assignments: &mut [LaneAssignment]) {
        for a in assignments {
            if let Some(row) = self.row_of(a.lane) {
                a.lane = row;
            }
        }
    }
}

pub fn compact_rows(assignments: &[LaneAssignment]) -> RowMap {
    let mut rows: BTreeMap<usize, usize> = assignments.iter().map(|a| (a.lane, 0)).collect();
    for (row, slot) in rows.values_mut().enumerate() {
        *slot = row;
    }
    RowMap { rows }
}
