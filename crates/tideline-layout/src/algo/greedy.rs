//! Greedy interval colouring: connectors are ignored, each period takes the lowest free lane.

use super::{by_start, into_assignments};
use crate::LayoutOptions;
use crate::input::{Link, PeriodSpan};
use crate::occupancy::LaneOccupancy;
use tideline_core::LaneAssignment;

pub fn layout_periods(
    periods: &[PeriodSpan],
    _links: &[Link],
    _options: &LayoutOptions,
) -> Vec<LaneAssignment> {
    let mut order: Vec<usize> = (0..periods.len()).collect();
    by_start(periods, &mut order);

    let mut occupancy = LaneOccupancy::new();
    let mut lanes: Vec<Option<usize>> = vec![None; periods.len()];
    for v in order {
        let p = &periods[v];
        let lane = occupancy.first_free(0, p.start, p.end);
        occupancy.insert(lane, p.start, p.end);
        lanes[v] = Some(lane);
    }

    tracing::debug!(lanes = occupancy.lane_count(), "greedy layout");
    into_assignments(periods, &lanes)
}
