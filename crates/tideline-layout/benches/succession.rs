use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use tideline_layout::{EventPoint, LayoutInput, LayoutOptions, Link, PeriodSpan, assign_lanes};

/// A few long dynasties, each a trunk of successors with short-lived offshoots.
fn build_timeline(trees: usize, depth: usize, offshoots: usize) -> LayoutInput {
    let mut periods = Vec::new();
    let mut events = Vec::new();
    let mut links = Vec::new();

    for t in 0..trees {
        let origin = (t * 37 % 500) as f64;
        let mut prev: Option<String> = None;
        for d in 0..depth {
            let id = format!("t{t}_d{d}");
            let start = origin + (d * 20) as f64;
            periods.push(PeriodSpan::new(id.clone(), start, start + 20.0));
            events.push(EventPoint::related(format!("{id}_e"), start + 3.0, id.clone()));
            if let Some(p) = &prev {
                links.push(Link::defined(p.clone(), id.clone()));
            }
            for o in 0..offshoots {
                let oid = format!("{id}_o{o}");
                let ostart = start + 2.0 + o as f64;
                periods.push(PeriodSpan::new(oid.clone(), ostart, ostart + 30.0));
                links.push(Link::defined(id.clone(), oid));
            }
            prev = Some(id);
        }
        events.push(EventPoint::new(format!("t{t}_free"), origin));
    }

    LayoutInput {
        periods,
        events,
        links,
    }
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign_lanes");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("trees_4_d10_o1", 4usize, 10usize, 1usize),
        ("trees_16_d20_o2", 16, 20, 2),
        ("trees_32_d40_o3", 32, 40, 3),
    ];
    let options = LayoutOptions::default();

    for (name, trees, depth, offshoots) in cases {
        let input = build_timeline(trees, depth, offshoots);
        for algorithm in ["succession", "greedy", "tree"] {
            group.bench_with_input(BenchmarkId::new(algorithm, name), &input, |b, input| {
                b.iter(|| {
                    let out = assign_lanes(black_box(input), Some(algorithm), &options);
                    black_box(out.map(|a| a.len()).unwrap_or_default());
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
