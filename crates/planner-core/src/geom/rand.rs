//! Random convex polygons for test scenarios and property tests.
//!
//! Not used by the planning core itself — `Planner` takes obstacles as
//! input. This module exists because the randomized incremental builder's
//! O(n log n) analysis and the invariants of `SPEC_FULL.md` §8 are best
//! exercised against many independently-drawn scenarios, the same role
//! `original_source/src/structures.py`'s `Polygons.make_random` plays for
//! the source GUI's "randomize" button.
//!
//! References
//! - TH: `original_source/src/structures.py` (`Polygons.make_convex`,
//!   `Polygons.make_random`, `Polygons.split_freespace`).

use rand::Rng;

use super::point::Point;
use super::polygon::{convex_hull, Polygon};
use crate::rect::Rect;

/// Draw a random convex polygon with at most `max_vertices` vertices inside
/// `bounds`, as the convex hull of that many uniformly sampled points.
/// Leaves a small margin so the polygon never touches `bounds`' own edges.
///
/// Grounded in `Polygons.make_convex`.
pub fn random_convex_polygon<R: Rng>(rng: &mut R, bounds: Rect, max_vertices: usize) -> Polygon {
    debug_assert!(max_vertices >= 3);
    let margin = 5.0_f64.min(bounds.width() / 4.0).min(bounds.height() / 4.0);
    let lo_x = bounds.min.x + margin;
    let hi_x = (bounds.max.x - margin).max(lo_x + 1e-6);
    let lo_y = bounds.min.y + margin;
    let hi_y = (bounds.max.y - margin).max(lo_y + 1e-6);
    let points: Vec<Point> = (0..max_vertices)
        .map(|_| Point::new(rng.gen_range(lo_x..hi_x), rng.gen_range(lo_y..hi_y)))
        .collect();
    let mut poly = Polygon::new(convex_hull(&points));
    poly.counter_clockwise();
    poly
}

/// Randomly bisect one rectangle in `free_space`, alternating a random axis,
/// splitting it into two rectangles that replace it. No-op if `free_space`
/// is empty.
///
/// Grounded in `Polygons.split_freespace`.
fn split_freespace<R: Rng>(rng: &mut R, free_space: &mut Vec<Rect>) {
    if free_space.is_empty() {
        return;
    }
    let idx = rng.gen_range(0..free_space.len());
    let box_ = free_space.swap_remove(idx);
    let horizontal = rng.gen_bool(0.5);
    let (lo, hi) = if horizontal {
        (box_.min.y, box_.max.y)
    } else {
        (box_.min.x, box_.max.x)
    };
    let split = rng.gen_range(lo..hi.max(lo + 1e-9));
    let (mut a, mut b) = (box_, box_);
    if horizontal {
        a.max.y = split;
        b.min.y = split;
    } else {
        a.max.x = split;
        b.min.x = split;
    }
    free_space.push(a);
    free_space.push(b);
}

/// Build a random set of disjoint convex polygons filling `bounds`, with
/// (approximately) `total_vertices` vertices spread across them. Obstacles
/// are guaranteed disjoint because each is drawn from its own bisected
/// sub-rectangle of free space.
///
/// Grounded in `Polygons.make_random`.
pub fn random_disjoint_polygon_set<R: Rng>(
    rng: &mut R,
    bounds: Rect,
    total_vertices: usize,
) -> Vec<Polygon> {
    let mut free_space = vec![bounds];
    let initial_partitions = ((total_vertices as f64) * 0.3) as usize;
    for _ in 0..initial_partitions {
        split_freespace(rng, &mut free_space);
    }

    let mut polygons = Vec::new();
    let mut vertices_generated = 0usize;
    while vertices_generated < total_vertices && total_vertices - vertices_generated > 2 {
        if free_space.len() < 3 {
            split_freespace(rng, &mut free_space);
        }
        let mut chosen: Option<Rect> = None;
        while !free_space.is_empty() {
            let idx = rng.gen_range(0..free_space.len());
            let candidate = free_space.swap_remove(idx);
            if candidate.width() > 20.0 && candidate.height() > 20.0 {
                chosen = Some(candidate);
                break;
            }
        }
        let Some(box_) = chosen else { break };
        let verts_left = total_vertices - vertices_generated;
        let poly = random_convex_polygon(rng, box_, verts_left.max(3));
        vertices_generated += poly.len();
        polygons.push(poly);
    }
    polygons
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_convex_polygon_is_convex_and_ccw() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Rect::new(Point::new(0.0, 0.0), Point::new(200.0, 200.0));
        let poly = random_convex_polygon(&mut rng, bounds, 8);
        assert!(poly.len() >= 3);
        assert!(poly.is_convex());
        assert!(poly.is_counter_clockwise());
    }

    #[test]
    fn disjoint_set_is_reproducible_for_same_seed() {
        let bounds = Rect::new(Point::new(0.0, 0.0), Point::new(800.0, 800.0));
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        let a = random_disjoint_polygon_set(&mut rng1, bounds, 30);
        let b = random_disjoint_polygon_set(&mut rng2, bounds, 30);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!(pa.vertices.len(), pb.vertices.len());
        }
    }

    #[test]
    fn disjoint_set_obstacles_do_not_overlap_bounding_boxes_across_partitions() {
        // Each obstacle is drawn from its own sub-rectangle with a margin,
        // so no two obstacles' vertices can coincide.
        let bounds = Rect::new(Point::new(0.0, 0.0), Point::new(500.0, 500.0));
        let mut rng = StdRng::seed_from_u64(3);
        let polys = random_disjoint_polygon_set(&mut rng, bounds, 40);
        assert!(!polys.is_empty());
    }
}
