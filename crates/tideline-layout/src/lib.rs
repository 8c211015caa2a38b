#![forbid(unsafe_code)]

//! Headless lane layout for timelines.
//!
//! Periods are assigned integer lanes by a pluggable algorithm (see [`AlgorithmRegistry`]; the
//! default `"succession"` keeps chains of succeeding periods on one row). Events are then placed
//! on the lane of the period they relate to, spread over a few sub-lanes, or on shared overflow
//! lanes below all periods. The whole computation is a pure function of its input: no state
//! survives between calls.

pub mod algo;
pub mod error;
pub mod events;
pub mod input;
pub mod occupancy;
pub mod registry;
pub mod rows;

pub use error::{Error, Result};
pub use events::{SubLaneScheme, layout_events};
pub use input::{EventPoint, LayoutInput, Link, PeriodSpan};
pub use registry::{AlgorithmRegistry, DEFAULT_ALGORITHM, PeriodAlgorithm, PeriodLayoutFn};
pub use rows::{RowMap, compact_rows};

use std::sync::Arc;
use tideline_core::{CalendarNormalizer, Dataset, LaneAssignment, TimeNormalizer};

#[derive(Clone)]
pub struct LayoutOptions {
    /// Used by [`layout_dataset`] to turn dataset times into linear coordinates.
    pub time_normalizer: Arc<dyn TimeNormalizer + Send + Sync>,
    /// Bound on every lane search and tree re-placement in the succession algorithm.
    pub max_placement_attempts: usize,
    /// Sub-lane preference order for events related to a period.
    pub sub_lanes: SubLaneScheme,
    /// Number of shared lanes for events without a laid-out period.
    pub overflow_lanes: usize,
    /// Minimum linear-time gap between two events sharing a sub-lane.
    pub event_spacing: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            time_normalizer: Arc::new(CalendarNormalizer::default()),
            max_placement_attempts: 100,
            sub_lanes: SubLaneScheme::default(),
            overflow_lanes: 3,
            event_spacing: 0.0,
        }
    }
}

impl LayoutOptions {
    pub fn with_time_normalizer(
        mut self,
        normalizer: impl TimeNormalizer + Send + Sync + 'static,
    ) -> Self {
        self.time_normalizer = Arc::new(normalizer);
        self
    }
}

/// Lays out periods with the named algorithm (default: `"succession"`), then events.
///
/// Period assignments come first, in input order, followed by event assignments in input order.
/// Look items up by `item_id` rather than by position.
pub fn assign_lanes(
    input: &LayoutInput,
    algorithm: Option<&str>,
    options: &LayoutOptions,
) -> Result<Vec<LaneAssignment>> {
    assign_lanes_with(&AlgorithmRegistry::default(), input, algorithm, options)
}

pub fn assign_lanes_with(
    registry: &AlgorithmRegistry,
    input: &LayoutInput,
    algorithm: Option<&str>,
    options: &LayoutOptions,
) -> Result<Vec<LaneAssignment>> {
    let algorithm = registry.resolve(algorithm)?;

    let timing_enabled = std::env::var("TIDELINE_LAYOUT_TIMING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let periods_start = timing_enabled.then(std::time::Instant::now);

    let mut assignments = (algorithm.layout)(&input.periods, &input.links, options);

    let periods_elapsed = periods_start.map(|s| s.elapsed());
    let events_start = timing_enabled.then(std::time::Instant::now);

    let lane_offset = assignments
        .iter()
        .map(|a| a.lane)
        .max()
        .map_or(0, |max_period_lane| max_period_lane + 1);
    let events = layout_events(&input.events, &assignments, lane_offset, options);
    assignments.extend(events);

    if let (Some(periods), Some(s)) = (periods_elapsed, events_start) {
        tracing::debug!(
            algorithm = algorithm.id,
            periods = ?periods,
            events = ?s.elapsed(),
            "lane assignment timings"
        );
    }
    Ok(assignments)
}

/// Normalizes `dataset` with `options.time_normalizer`, then runs [`assign_lanes`].
pub fn layout_dataset(
    dataset: &Dataset,
    algorithm: Option<&str>,
    options: &LayoutOptions,
) -> Result<Vec<LaneAssignment>> {
    let input = LayoutInput::from_dataset(dataset, options.time_normalizer.as_ref())?;
    assign_lanes(&input, algorithm, options)
}

/// `max(lane) + 1`, or 0 when there are no assignments.
pub fn lane_count(assignments: &[LaneAssignment]) -> usize {
    assignments.iter().map(|a| a.lane).max().map_or(0, |m| m + 1)
}
