//! Per-lane interval bookkeeping shared by all period algorithms.

/// Half-open overlap test: touching endpoints do not collide.
pub fn overlaps(s1: f64, e1: f64, s2: f64, e2: f64) -> bool {
    s1 < e2 && s2 < e1
}

/// Intervals already placed on each lane, indexed by lane number.
#[derive(Debug, Clone, Default)]
pub struct LaneOccupancy {
    lanes: Vec<Vec<(f64, f64)>>,
}

impl LaneOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// One past the highest lane holding anything; every lane at or above it is empty.
    pub fn lane_count(&self) -> usize {
        self.lanes
            .iter()
            .rposition(|l| !l.is_empty())
            .map_or(0, |i| i + 1)
    }

    pub fn collides(&self, lane: usize, start: f64, end: f64) -> bool {
        self.lanes
            .get(lane)
            .is_some_and(|l| l.iter().any(|&(s, e)| overlaps(start, end, s, e)))
    }

    pub fn insert(&mut self, lane: usize, start: f64, end: f64) {
        if self.lanes.len() <= lane {
            self.lanes.resize_with(lane + 1, Vec::new);
        }
        self.lanes[lane].push((start, end));
    }

    /// Lowest lane `>= from` where `[start, end)` fits.
    pub fn first_free(&self, from: usize, start: f64, end: f64) -> usize {
        let mut lane = from;
        while self.collides(lane, start, end) {
            lane += 1;
        }
        lane
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!overlaps(1900.0, 1950.0, 1950.0, 2000.0));
        assert!(overlaps(1900.0, 1951.0, 1950.0, 2000.0));
        assert!(overlaps(1900.0, 2000.0, 1950.0, 1960.0));
        assert!(!overlaps(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn first_free_skips_colliding_lanes() {
        let mut occ = LaneOccupancy::new();
        occ.insert(0, 0.0, 10.0);
        occ.insert(1, 5.0, 15.0);
        assert_eq!(occ.first_free(0, 10.0, 20.0), 0);
        assert_eq!(occ.first_free(0, 8.0, 9.0), 2);
        assert_eq!(occ.first_free(1, 0.0, 4.0), 1);
        assert_eq!(occ.lane_count(), 2);
    }

    #[test]
    fn lane_count_ignores_trailing_empty_lanes() {
        let mut occ = LaneOccupancy::new();
        assert_eq!(occ.lane_count(), 0);
        occ.insert(3, 0.0, 1.0);
        assert_eq!(occ.lane_count(), 4);
        assert!(!occ.collides(2, 0.0, 1.0));
        assert!(occ.collides(3, 0.5, 2.0));
    }
}
