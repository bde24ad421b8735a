//! Point-location query timing across a range of obstacle vertex counts,
//! against a map built once per size.
//!
//! References
//! - TH: `original_source/timing/time_query.py` (`QueryCases`).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use planner_core::geom::point::Point;
use planner_core::geom::rand::random_disjoint_polygon_set;
use planner_core::rect::Rect;
use planner_core::Planner;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_location_query");
    let bounds = Rect::from_corners(10.0, 10.0, 790.0, 790.0);

    for total_vertices in [15, 45, 90, 150] {
        let mut rng = StdRng::seed_from_u64(total_vertices as u64);
        let obstacles = random_disjoint_polygon_set(&mut rng, bounds, total_vertices);

        let mut planner = Planner::new(bounds, 1);
        planner.set_obstacles(&obstacles);
        planner.build().unwrap();

        let query_point = Point::new(rng.gen_range(20.0..780.0), rng.gen_range(20.0..780.0));

        group.bench_with_input(BenchmarkId::from_parameter(total_vertices), &query_point, |b, &p| {
            b.iter(|| planner.locate(p));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
