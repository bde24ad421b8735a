//! Incremental trapezoidal-map build timing across a range of obstacle
//! vertex counts.
//!
//! References
//! - TH: `original_source/timing/time_pointlocation.py` (`DecompositionCases`).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use planner_core::geom::rand::random_disjoint_polygon_set;
use planner_core::rect::Rect;
use planner_core::Planner;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_build");
    let bounds = Rect::from_corners(10.0, 10.0, 790.0, 790.0);

    for total_vertices in [15, 45, 90, 150] {
        let mut rng = StdRng::seed_from_u64(total_vertices as u64);
        let obstacles = random_disjoint_polygon_set(&mut rng, bounds, total_vertices);

        group.bench_with_input(BenchmarkId::from_parameter(total_vertices), &obstacles, |b, obstacles| {
            b.iter(|| {
                let mut planner = Planner::new(bounds, 1);
                planner.set_obstacles(obstacles);
                planner.build().unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
