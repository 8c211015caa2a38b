use tideline_core::LaneAssignment;
use tideline_layout::algo::{greedy, tree};
use tideline_layout::{LayoutOptions, Link, PeriodSpan};

fn spans(items: &[(&str, f64, f64)]) -> Vec<PeriodSpan> {
    items
        .iter()
        .map(|&(id, s, e)| PeriodSpan::new(id, s, e))
        .collect()
}

fn lanes(out: &[LaneAssignment]) -> Vec<usize> {
    out.iter().map(|a| a.lane).collect()
}

#[test]
fn greedy_ignores_succession_links() {
    let periods = spans(&[
        ("a1", 0.0, 10.0),
        ("a2", 10.0, 20.0),
        ("b1", 100.0, 110.0),
        ("b2", 110.0, 120.0),
    ]);
    let links = [Link::defined("a1", "a2"), Link::defined("b1", "b2")];
    let out = greedy::layout_periods(&periods, &links, &LayoutOptions::default());
    assert_eq!(lanes(&out), vec![0, 0, 0, 0]);
}

#[test]
fn greedy_opens_a_lane_per_concurrent_period() {
    let periods = spans(&[
        ("late", 30.0, 40.0),
        ("a", 0.0, 20.0),
        ("b", 5.0, 25.0),
        ("c", 10.0, 30.0),
    ]);
    let out = greedy::layout_periods(&periods, &[], &LayoutOptions::default());
    // Sorted by start: a→0, b→1, c→2, late→0 once a has ended.
    assert_eq!(lanes(&out), vec![0, 0, 1, 2]);
    assert!(out.iter().all(|a| a.is_period() && a.sub_lane.is_none()));
}

#[test]
fn tree_layout_keeps_each_tree_in_its_own_band() {
    let periods = spans(&[
        ("r", 0.0, 10.0),
        ("x", 10.0, 20.0),
        ("y", 12.0, 30.0),
        ("s1", 50.0, 60.0),
        ("s2", 60.0, 70.0),
        ("loner", 0.0, 5.0),
    ]);
    let links = [
        Link::defined("r", "x"),
        Link::defined("r", "y"),
        Link::defined("s1", "s2"),
    ];
    let out = tree::layout_periods(&periods, &links, &LayoutOptions::default());
    // r's tree uses lanes 0-1, s1's tree starts at 2, loner fills the first free lane.
    assert_eq!(lanes(&out), vec![0, 0, 1, 2, 2, 1]);
}
