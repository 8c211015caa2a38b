//! Hierarchical grouping: the succession forest without the trunk/branch heuristic.
//!
//! Trees are laid out oldest root first. Within a tree every member, in pre-order, takes the
//! lowest free lane numbered at or after the tree's base lane, so a tree never reaches back into
//! the lanes of earlier trees. Unconnected periods then fill from lane 0.

use super::forest::Forest;
use super::{by_start, into_assignments};
use crate::LayoutOptions;
use crate::input::{Link, PeriodSpan};
use crate::occupancy::LaneOccupancy;
use tideline_core::LaneAssignment;

pub fn layout_periods(
    periods: &[PeriodSpan],
    links: &[Link],
    _options: &LayoutOptions,
) -> Vec<LaneAssignment> {
    let forest = Forest::build(periods, links);
    let mut occupancy = LaneOccupancy::new();
    let mut lanes: Vec<Option<usize>> = vec![None; periods.len()];
    let mut base = 0;

    for &root in &forest.roots {
        let mut highest = base;
        for node in forest.preorder(root) {
            let v = forest.period(node);
            let p = &periods[v];
            let lane = occupancy.first_free(base, p.start, p.end);
            occupancy.insert(lane, p.start, p.end);
            lanes[v] = Some(lane);
            highest = highest.max(lane);
        }
        base = highest + 1;
    }

    let mut rest = forest.unconnected.clone();
    by_start(periods, &mut rest);
    for v in rest {
        let p = &periods[v];
        let lane = occupancy.first_free(0, p.start, p.end);
        occupancy.insert(lane, p.start, p.end);
        lanes[v] = Some(lane);
    }

    tracing::debug!(
        trees = forest.roots.len(),
        lanes = occupancy.lane_count(),
        "tree layout"
    );
    into_assignments(periods, &lanes)
}
