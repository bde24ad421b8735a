//! Minkowski sum timing across a range of combined vertex counts.
//!
//! References
//! - TH: `original_source/timing/time_minkowski.py` (`MinkowskiCases`).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use planner_core::geom::minkowski::minkowski_sum;
use planner_core::geom::rand::random_convex_polygon;
use planner_core::rect::Rect;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_minkowski(c: &mut Criterion) {
    let mut group = c.benchmark_group("minkowski_sum");
    let bounds = Rect::from_corners(10.0, 10.0, 790.0, 790.0);

    for total_vertices in [6, 30, 60, 120, 240] {
        let mut rng = StdRng::seed_from_u64(total_vertices as u64);
        let m = total_vertices / 2;
        let n = total_vertices - m;
        let vehicle = random_convex_polygon(&mut rng, bounds, m.max(3));
        let obstacle = random_convex_polygon(&mut rng, bounds, n.max(3));

        group.bench_with_input(BenchmarkId::from_parameter(total_vertices), &total_vertices, |b, _| {
            b.iter(|| minkowski_sum(&obstacle, &vehicle, 0).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_minkowski);
criterion_main!(benches);
