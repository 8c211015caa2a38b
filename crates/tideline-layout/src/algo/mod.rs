//! Period lane layout strategies.
//!
//! Every strategy has the [`crate::registry::PeriodLayoutFn`] shape and emits one assignment
//! per input period, in input order.

pub mod forest;
pub mod greedy;
pub mod succession;
pub mod tree;

use crate::input::PeriodSpan;
use tideline_core::LaneAssignment;

/// Stable order of period indices by start time (ties keep input order).
pub(crate) fn by_start(periods: &[PeriodSpan], indices: &mut [usize]) {
    indices.sort_by(|&a, &b| periods[a].start.total_cmp(&periods[b].start));
}

pub(crate) fn into_assignments(
    periods: &[PeriodSpan],
    lanes: &[Option<usize>],
) -> Vec<LaneAssignment> {
    periods
        .iter()
        .zip(lanes)
        .map(|(p, lane)| {
            LaneAssignment::period(p.id.clone(), lane.unwrap_or_default(), p.start, p.end)
        })
        .collect()
}
