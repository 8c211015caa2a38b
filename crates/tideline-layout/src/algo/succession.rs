//! Succession-tree period layout.
//!
//! Each tree of `defined` connectors is split into trunks: maximal chains of periods that
//! strictly succeed one another, which share a lane. Children that do not continue a trunk become
//! branches and get their own trunk on a lane offset from the parent's. The main trunk's direct
//! branches alternate above and below it (first above); deeper branches keep their parent
//! branch's direction. A branch that would need a lane above lane 0 pushes the whole tree down
//! one lane and the tree is placed again.
//!
//! Every search is bounded by [`LayoutOptions::max_placement_attempts`]; when a bound runs out
//! the item goes to a fresh lane past everything placed so far, so the result is always
//! complete and overlap-free.

use super::forest::Forest;
use super::{by_start, into_assignments};
use crate::LayoutOptions;
use crate::input::{Link, PeriodSpan};
use crate::occupancy::LaneOccupancy;
use std::convert::Infallible;
use tideline_core::LaneAssignment;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trunk {
    /// Period indices; each member starts no earlier than the previous one ends.
    pub members: Vec<usize>,
    /// Indices into [`TrunkTree::trunks`] of the children not chosen as a continuation, in
    /// member then child order.
    pub branches: Vec<usize>,
}

/// All trunks of one succession tree, flattened; index 0 is the main trunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrunkTree {
    pub trunks: Vec<Trunk>,
}

impl TrunkTree {
    pub fn extract(forest: &Forest, periods: &[PeriodSpan], lineage: &[f64], root: usize) -> Self {
        let mut trunks = vec![Trunk::default()];
        let mut work = vec![(0, root)];
        while let Some((t, node)) = work.pop() {
            let mut cur = Some(node);
            while let Some(n) = cur {
                trunks[t].members.push(forest.period(n));
                let next = successor(forest, periods, lineage, n);
                for &child in forest.children(n) {
                    if Some(child) != next {
                        let branch = trunks.len();
                        trunks.push(Trunk::default());
                        trunks[t].branches.push(branch);
                        work.push((branch, child));
                    }
                }
                cur = next;
            }
        }
        Self { trunks }
    }

    pub fn main(&self) -> &Trunk {
        &self.trunks[0]
    }

    pub fn trunk(&self, index: usize) -> &Trunk {
        &self.trunks[index]
    }

    /// Number of periods across every trunk.
    pub fn len(&self) -> usize {
        self.trunks.iter().map(|t| t.members.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Child that continues `node`'s trunk: starts at or after `node` ends, earliest start first,
/// then the one whose descendants reach furthest into the future.
fn successor(
    forest: &Forest,
    periods: &[PeriodSpan],
    lineage: &[f64],
    node: usize,
) -> Option<usize> {
    let end = periods[forest.period(node)].end;
    let mut best: Option<usize> = None;
    for &child in forest.children(node) {
        let start = periods[forest.period(child)].start;
        if start < end {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => {
                let b_start = periods[forest.period(b)].start;
                start < b_start || (start == b_start && lineage[child] > lineage[b])
            }
        };
        if better {
            best = Some(child);
        }
    }
    best
}

pub fn layout_periods(
    periods: &[PeriodSpan],
    links: &[Link],
    options: &LayoutOptions,
) -> Vec<LaneAssignment> {
    let forest = Forest::build(periods, links);
    let lineage = forest.lineage_ends(periods);
    let max_attempts = options.max_placement_attempts.max(1);

    let mut occupancy = LaneOccupancy::new();
    let mut lanes: Vec<Option<usize>> = vec![None; periods.len()];
    let mut next_start_lane = 0;

    for &root in &forest.roots {
        let tree = TrunkTree::extract(&forest, periods, &lineage, root);
        let placed = place_tree(&tree, periods, &occupancy, next_start_lane, max_attempts);
        for &(period, lane) in &placed {
            let p = &periods[period];
            occupancy.insert(lane, p.start, p.end);
            lanes[period] = Some(lane);
        }
        if let Some(highest) = placed.iter().map(|&(_, lane)| lane).max() {
            next_start_lane = highest + 1;
        }
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
        unconnected = forest.unconnected.len(),
        lanes = occupancy.lane_count(),
        "succession layout"
    );
    into_assignments(periods, &lanes)
}

/// Places one tree, restarting one lane lower each time a branch runs out of room above.
fn place_tree(
    tree: &TrunkTree,
    periods: &[PeriodSpan],
    global: &LaneOccupancy,
    start_lane: usize,
    max_attempts: usize,
) -> Vec<(usize, usize)> {
    let mut base = start_lane;
    for _ in 0..max_attempts {
        let mut attempt = TreePlacement::new(periods, global, max_attempts);
        match attempt.place(tree, base, |_, trunk_lane| Err(ShiftDown { trunk_lane })) {
            Ok(()) => return attempt.placed,
            Err(ShiftDown { trunk_lane }) => base = trunk_lane + 1,
        }
    }

    tracing::warn!(
        root = %periods[tree.main().members[0]].id,
        attempts = max_attempts,
        "tree placement did not settle; branches without room go to fresh lanes"
    );
    let mut settle = TreePlacement::new(periods, global, max_attempts);
    let Ok(()) = settle.place(tree, base, |p, _| Ok::<_, Infallible>(p.fresh_lane()));
    settle.placed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct ShiftDown {
    trunk_lane: usize,
}

struct TreePlacement<'a> {
    periods: &'a [PeriodSpan],
    global: &'a LaneOccupancy,
    local: LaneOccupancy,
    placed: Vec<(usize, usize)>,
    max_attempts: usize,
}

impl<'a> TreePlacement<'a> {
    fn new(periods: &'a [PeriodSpan], global: &'a LaneOccupancy, max_attempts: usize) -> Self {
        Self {
            periods,
            global,
            local: LaneOccupancy::new(),
            placed: Vec::new(),
            max_attempts,
        }
    }

    fn fits(&self, members: &[usize], lane: usize) -> bool {
        members.iter().all(|&m| {
            let p = &self.periods[m];
            !self.global.collides(lane, p.start, p.end)
                && !self.local.collides(lane, p.start, p.end)
        })
    }

    fn fresh_lane(&self) -> usize {
        self.global.lane_count().max(self.local.lane_count())
    }

    fn occupy(&mut self, members: &[usize], lane: usize) {
        for &m in members {
            let p = &self.periods[m];
            self.local.insert(lane, p.start, p.end);
            self.placed.push((m, lane));
        }
    }

    /// Lane for a branch beside `parent_lane`, or `None` when the search runs past lane 0.
    fn branch_lane(&self, members: &[usize], parent_lane: usize, dir: Direction) -> Option<usize> {
        for offset in 1..=self.max_attempts {
            let candidate = match dir {
                Direction::Up => parent_lane.checked_sub(offset)?,
                Direction::Down => parent_lane + offset,
            };
            if self.fits(members, candidate) {
                return Some(candidate);
            }
        }
        Some(self.fresh_lane())
    }

    /// Places the main trunk at or after `base`, then every branch in pre-order.
    ///
    /// `overflow` is asked for a lane (given the main trunk's lane) whenever a branch would have
    /// to go above lane 0.
    fn place<E>(
        &mut self,
        tree: &TrunkTree,
        base: usize,
        overflow: impl Fn(&Self, usize) -> Result<usize, E>,
    ) -> Result<(), E> {
        let main = tree.main();
        let trunk_lane = (base..base + self.max_attempts)
            .find(|&lane| self.fits(&main.members, lane))
            .unwrap_or_else(|| self.fresh_lane().max(base));
        self.occupy(&main.members, trunk_lane);

        let mut work: Vec<(usize, usize, Direction)> = main
            .branches
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &branch)| {
                let dir = if i % 2 == 0 {
                    Direction::Up
                } else {
                    Direction::Down
                };
                (branch, trunk_lane, dir)
            })
            .collect();
        while let Some((t, parent_lane, dir)) = work.pop() {
            let branch = tree.trunk(t);
            let lane = match self.branch_lane(&branch.members, parent_lane, dir) {
                Some(lane) => lane,
                None => overflow(&*self, trunk_lane)?,
            };
            self.occupy(&branch.members, lane);
            work.extend(branch.branches.iter().rev().map(|&sub| (sub, lane, dir)));
        }
        Ok(())
    }
}
