use std::collections::BTreeMap;
use tideline_core::LaneAssignment;
use tideline_layout::algo::succession::layout_periods;
use tideline_layout::occupancy::overlaps;
use tideline_layout::{LayoutOptions, Link, PeriodSpan};

fn spans(items: &[(&str, f64, f64)]) -> Vec<PeriodSpan> {
    items
        .iter()
        .map(|&(id, s, e)| PeriodSpan::new(id, s, e))
        .collect()
}

fn lanes(out: &[LaneAssignment]) -> Vec<(&str, usize)> {
    out.iter().map(|a| (a.item_id.as_str(), a.lane)).collect()
}

fn assert_overlap_free(out: &[LaneAssignment]) {
    for (i, a) in out.iter().enumerate() {
        for b in &out[i + 1..] {
            if a.lane == b.lane {
                assert!(
                    !overlaps(a.start_time, a.end_time, b.start_time, b.end_time),
                    "{} and {} collide on lane {}",
                    a.item_id,
                    b.item_id,
                    a.lane
                );
            }
        }
    }
}

#[test]
fn chain_of_successors_stays_on_one_lane() {
    let periods = spans(&[
        ("a", 2000.0, 2010.0),
        ("b", 2010.0, 2020.0),
        ("c", 2025.0, 2030.0),
    ]);
    let links = [Link::defined("a", "b"), Link::defined("b", "c")];
    let out = layout_periods(&periods, &links, &LayoutOptions::default());
    assert_eq!(lanes(&out), vec![("a", 0), ("b", 0), ("c", 0)]);
}

#[test]
fn undefined_connectors_do_not_build_trees() {
    let periods = spans(&[
        ("a1", 0.0, 10.0),
        ("a2", 10.0, 20.0),
        ("b1", 100.0, 110.0),
        ("b2", 110.0, 120.0),
    ]);
    let undefined = [Link::undefined("a1", "a2"), Link::undefined("b1", "b2")];
    let loose = layout_periods(&periods, &undefined, &LayoutOptions::default());
    assert!(loose.iter().all(|a| a.lane == 0));

    let defined = [Link::defined("a1", "a2"), Link::defined("b1", "b2")];
    let trees = layout_periods(&periods, &defined, &LayoutOptions::default());
    assert_eq!(
        lanes(&trees),
        vec![("a1", 0), ("a2", 0), ("b1", 1), ("b2", 1)]
    );
}

#[test]
fn later_trees_start_below_earlier_ones() {
    let periods = spans(&[
        ("b1", 100.0, 110.0),
        ("b2", 110.0, 120.0),
        ("a1", 0.0, 10.0),
        ("a2", 10.0, 20.0),
        ("solo", 200.0, 210.0),
    ]);
    let links = [Link::defined("b1", "b2"), Link::defined("a1", "a2")];
    let out = layout_periods(&periods, &links, &LayoutOptions::default());
    // Oldest tree first on lane 0; the next tree opens lane 1 even though lane 0 is free
    // at that time. Unconnected periods scan from lane 0 again.
    assert_eq!(
        lanes(&out),
        vec![("b1", 1), ("b2", 1), ("a1", 0), ("a2", 0), ("solo", 0)]
    );
}

#[test]
fn overlapping_children_become_branches_around_the_trunk() {
    let periods = spans(&[
        ("root", 0.0, 10.0),
        ("heir", 10.0, 40.0),
        ("rival", 8.0, 30.0),
        ("splinter", 9.0, 20.0),
    ]);
    let links = [
        Link::defined("root", "heir"),
        Link::defined("root", "rival"),
        Link::defined("root", "splinter"),
    ];
    let out = layout_periods(&periods, &links, &LayoutOptions::default());
    assert_overlap_free(&out);

    let lane_of = |id: &str| out.iter().find(|a| a.item_id == id).unwrap().lane;
    let trunk = lane_of("root");
    assert_eq!(lane_of("heir"), trunk);
    // rival (first branch) goes above, splinter (second) below.
    assert_eq!(lane_of("rival") + 1, trunk);
    assert_eq!(lane_of("splinter"), trunk + 1);
}

#[test]
fn deeper_branches_keep_their_direction() {
    let periods = spans(&[
        ("root", 0.0, 10.0),
        ("heir", 10.0, 40.0),
        ("up", 5.0, 30.0),
        ("up-child", 6.0, 12.0),
    ]);
    let links = [
        Link::defined("root", "heir"),
        Link::defined("root", "up"),
        Link::defined("up", "up-child"),
    ];
    let out = layout_periods(&periods, &links, &LayoutOptions::default());
    assert_overlap_free(&out);
    // Shifted down twice so the nested upward branch fits above lane 0.
    assert_eq!(
        lanes(&out),
        vec![("root", 2), ("heir", 2), ("up", 1), ("up-child", 0)]
    );
}

#[test]
fn pathological_fan_out_is_still_complete_and_overlap_free() {
    let mut items = vec![("root".to_string(), 0.0, 10.0)];
    let mut links = Vec::new();
    for i in 0..40 {
        let id = format!("c{i}");
        links.push(Link::defined("root", id.clone()));
        items.push((id, 5.0, 50.0));
    }
    let periods: Vec<PeriodSpan> = items
        .into_iter()
        .map(|(id, s, e)| PeriodSpan::new(id, s, e))
        .collect();

    for attempts in [1, 3, 100] {
        let options = LayoutOptions {
            max_placement_attempts: attempts,
            ..Default::default()
        };
        let out = layout_periods(&periods, &links, &options);
        assert_eq!(out.len(), periods.len());
        assert_overlap_free(&out);
    }
}

#[test]
fn cycles_are_laid_out_as_unconnected_periods() {
    let periods = spans(&[("a", 0.0, 10.0), ("b", 10.0, 20.0)]);
    let links = [Link::defined("a", "b"), Link::defined("b", "a")];
    let out = layout_periods(&periods, &links, &LayoutOptions::default());
    assert_eq!(lanes(&out), vec![("a", 0), ("b", 0)]);
}

fn assert_lanes_disjoint(out: &[LaneAssignment]) {
    let mut by_lane: BTreeMap<usize, Vec<(f64, f64)>> = BTreeMap::new();
    for a in out {
        by_lane
            .entry(a.lane)
            .or_default()
            .push((a.start_time, a.end_time));
    }
    for (lane, mut spans) in by_lane {
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "overlap on lane {lane}: {pair:?}");
        }
    }
}

fn chain(n: usize, length: f64) -> (Vec<PeriodSpan>, Vec<Link>) {
    let periods = (0..n)
        .map(|i| PeriodSpan::new(format!("p{i}"), i as f64, i as f64 + length))
        .collect();
    let links = (1..n)
        .map(|i| Link::defined(format!("p{}", i - 1), format!("p{i}")))
        .collect();
    (periods, links)
}

#[test]
fn very_long_succession_chain_shares_one_lane() {
    let (periods, links) = chain(100_000, 1.0);
    let out = layout_periods(&periods, &links, &LayoutOptions::default());
    assert_eq!(out.len(), 100_000);
    assert!(out.iter().all(|a| a.lane == 0));
}

#[test]
fn very_deep_nesting_of_overlapping_children_is_placed() {
    // Every child overlaps its parent, so each one is a branch of the one before.
    let (periods, links) = chain(100_000, 2.0);
    let out = layout_periods(&periods, &links, &LayoutOptions::default());
    assert_eq!(out.len(), 100_000);
    for (i, a) in out.iter().enumerate() {
        assert_eq!(a.item_id, format!("p{i}"));
    }
    assert_lanes_disjoint(&out);
}
