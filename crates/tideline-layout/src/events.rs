//! Event lane and sub-lane layout.
//!
//! Events tied to a laid-out period share that period's lane and are spread over a small set of
//! sub-lanes. Everything else goes to a few shared overflow lanes below all period lanes.

use crate::LayoutOptions;
use crate::input::EventPoint;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tideline_core::LaneAssignment;

/// Ordered sub-lane labels tried for each related event, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubLaneScheme {
    labels: Vec<i32>,
}

impl SubLaneScheme {
    /// Duplicate labels are dropped; an empty list becomes `[0]`.
    pub fn new(labels: impl IntoIterator<Item = i32>) -> Self {
        let mut out: Vec<i32> = Vec::new();
        for label in labels {
            if !out.contains(&label) {
                out.push(label);
            }
        }
        if out.is_empty() {
            out.push(0);
        }
        Self { labels: out }
    }

    /// Just below the period, further below, then above.
    pub fn below_first() -> Self {
        Self::new([0, 1, -1])
    }

    /// Middle, top, bottom.
    pub fn middle_first() -> Self {
        Self::new([1, 0, 2])
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }
}

impl Default for SubLaneScheme {
    fn default() -> Self {
        Self::below_first()
    }
}

/// Last end time per slot label; a slot is free for `time` unless `time < last_end`.
#[derive(Debug, Clone)]
pub struct SlotTracker {
    last_end: IndexMap<i32, f64>,
}

impl SlotTracker {
    pub fn new(labels: &[i32]) -> Self {
        Self {
            last_end: labels.iter().map(|&l| (l, f64::NEG_INFINITY)).collect(),
        }
    }

    /// First free slot in label order, else the one freed earliest. Records the event's end.
    pub fn take(&mut self, time: f64, spacing: f64) -> i32 {
        let free = self
            .last_end
            .iter()
            .find(|&(_, &end)| time >= end)
            .map(|(&label, _)| label);
        let label = free.unwrap_or_else(|| self.least_recently_used());
        if let Some(end) = self.last_end.get_mut(&label) {
            *end = end.max(time + spacing);
        }
        label
    }

    fn least_recently_used(&self) -> i32 {
        let mut best: Option<(i32, f64)> = None;
        for (&label, &end) in &self.last_end {
            if best.is_none_or(|(_, b)| end < b) {
                best = Some((label, end));
            }
        }
        best.map_or(0, |(label, _)| label)
    }
}

/// Lays out every event; output order follows `events`.
///
/// `period_lanes` supplies the lane of each period assignment (other kinds are ignored);
/// unrelated events land on `lane_offset + overflow index`.
pub fn layout_events(
    events: &[EventPoint],
    period_lanes: &[LaneAssignment],
    lane_offset: usize,
    options: &LayoutOptions,
) -> Vec<LaneAssignment> {
    let lane_of: FxHashMap<&str, usize> = period_lanes
        .iter()
        .filter(|a| a.is_period())
        .map(|a| (a.item_id.as_str(), a.lane))
        .collect();

    let mut related: IndexMap<usize, Vec<usize>> = IndexMap::new();
    let mut unrelated: Vec<usize> = Vec::new();
    for (i, e) in events.iter().enumerate() {
        match e.relates_to.as_deref().and_then(|id| lane_of.get(id)) {
            Some(&lane) => related.entry(lane).or_default().push(i),
            None => unrelated.push(i),
        }
    }

    let spacing = options.event_spacing.max(0.0);
    let mut out: Vec<Option<LaneAssignment>> = vec![None; events.len()];

    for (&lane, group) in &mut related {
        group.sort_by(|&a, &b| events[a].time.total_cmp(&events[b].time));
        let mut slots = SlotTracker::new(options.sub_lanes.labels());
        for &i in group.iter() {
            let e = &events[i];
            let sub = slots.take(e.time, spacing);
            out[i] = Some(LaneAssignment::event(e.id.clone(), lane, e.time, sub));
        }
    }

    let overflow: Vec<i32> = (0..options.overflow_lanes.max(1))
        .map(|i| i32::try_from(i).unwrap_or(i32::MAX))
        .collect();
    let mut slots = SlotTracker::new(&overflow);
    unrelated.sort_by(|&a, &b| events[a].time.total_cmp(&events[b].time));
    for i in unrelated {
        let e = &events[i];
        let index = slots.take(e.time, spacing);
        let lane = lane_offset + usize::try_from(index).unwrap_or_default();
        out[i] = Some(LaneAssignment::event(e.id.clone(), lane, e.time, index));
    }

    tracing::debug!(
        related_lanes = related.len(),
        events = events.len(),
        "event layout"
    );
    out.into_iter().flatten().collect()
}
