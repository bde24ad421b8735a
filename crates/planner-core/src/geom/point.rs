//! Points, segments, and the small set of scalar predicates everything else
//! in the crate is built from.
//!
//! References
//! - Code cross-refs: `polygon::Polygon`, `trapezoid::types::Trapezoid`.

use nalgebra::Vector2;

/// A point in the plane. Alias to match the rest of the crate's nalgebra usage.
pub type Point = Vector2<f64>;

/// A large sentinel returned by [`interp`] when queried outside a segment's
/// x-range. Large enough that any `<=`/`>=` predicate built on top of it
/// fails the way an out-of-range query should.
pub const OUT_OF_RANGE_SENTINEL: f64 = -1.0e9;

/// An ordered pair of points, normalized left-to-right by x (`make_lr`).
///
/// Segments are value objects: comparisons and hashing are not provided
/// because floating-point coordinates make bitwise equality the wrong
/// default; callers compare with [`approx_eq`] at the call site.
#[derive(Debug, Copy, Clone)]
pub struct Segment {
    pub left: Point,
    pub right: Point,
}

impl Segment {
    /// Build a segment, normalizing endpoints so `left.x <= right.x`.
    pub fn new(a: Point, b: Point) -> Self {
        make_lr(a, b)
    }

    /// Build a segment without normalizing. Callers must already know the
    /// ordering (e.g. a chord stored on a trapezoid is always left-to-right
    /// by construction).
    pub fn new_lr_unchecked(left: Point, right: Point) -> Self {
        Segment { left, right }
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        approx_eq(self.left.x, self.right.x, 1e-9)
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        approx_eq(self.left.y, self.right.y, 1e-9)
    }

    /// The slope of the line through this segment.
    ///
    /// Callers must not call this on a vertical segment; the contract is the
    /// caller's, not this function's (see module docs).
    #[inline]
    pub fn slope(&self) -> f64 {
        slope(self.left, self.right)
    }

    /// `y` on the line through this segment at `x`. Returns a large negative
    /// sentinel if `x` lies outside `[left.x, right.x]` by more than `eps`.
    #[inline]
    pub fn interp(&self, x: f64, eps: f64) -> f64 {
        interp(self.left, self.right, x, eps)
    }
}

/// Normalize two endpoints so the left point (smaller x) comes first.
/// Ties are broken by keeping `a` first, consistently.
pub fn make_lr(a: Point, b: Point) -> Segment {
    if a.x <= b.x {
        Segment::new_lr_unchecked(a, b)
    } else {
        Segment::new_lr_unchecked(b, a)
    }
}

/// Slope of the line through `left -> right`. Undefined (±∞ by IEEE 754
/// division) for vertical pairs; callers must avoid calling this on those.
#[inline]
pub fn slope(left: Point, right: Point) -> f64 {
    (right.y - left.y) / (right.x - left.x)
}

/// Linear interpolation of the line through `left -> right` at `x`.
///
/// If `x` lies more than `eps` outside `[left.x, right.x]`, returns
/// [`OUT_OF_RANGE_SENTINEL`]: a value so far below any real coordinate that
/// predicates built on top of `interp` (`<=`, `>=`) fail as they should for
/// an out-of-range query. Never trust this function's output for
/// constructing new geometry outside the segment's x-range.
pub fn interp(left: Point, right: Point, x: f64, eps: f64) -> f64 {
    if x < left.x - eps || x > right.x + eps {
        return OUT_OF_RANGE_SENTINEL;
    }
    let dx = right.x - left.x;
    if dx.abs() < eps {
        // Horizontal (or degenerate) segment: the common y is the answer.
        return left.y;
    }
    let m = (right.y - left.y) / dx;
    let b = left.y - m * left.x;
    m * x + b
}

/// Outward-direction-agnostic normal of the directed edge `left -> right`:
/// `(-dy, dx)`. The caller picks the sign that points outward (see
/// `polygon::edge_angles`).
#[inline]
pub fn normal(left: Point, right: Point) -> Point {
    let d = right - left;
    Point::new(-d.y, d.x)
}

/// True if `p` is `eps`-collinear with `edge` and within its span (x-range
/// for non-vertical edges, y-range for vertical ones).
pub fn point_on_edge(left: Point, right: Point, p: Point, eps: f64) -> bool {
    if (right.x - left.x).abs() > eps {
        let (l, r) = if left.x <= right.x { (left, right) } else { (right, left) };
        let y = interp(l, r, p.x, eps);
        approx_eq(y, p.y, eps)
    } else {
        let (lo, hi) = if left.y <= right.y { (left.y, right.y) } else { (right.y, left.y) };
        p.y >= lo - eps && p.y <= hi + eps && (p.x - left.x).abs() <= eps
    }
}

#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[inline]
pub fn point_approx_eq(a: Point, b: Point, eps: f64) -> bool {
    (a - b).norm() <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_lr_orders_by_x() {
        let a = Point::new(5.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let s = make_lr(a, b);
        assert_eq!(s.left, b);
        assert_eq!(s.right, a);
    }

    #[test]
    fn interp_returns_sentinel_outside_range() {
        let l = Point::new(0.0, 0.0);
        let r = Point::new(10.0, 10.0);
        assert!(interp(l, r, 5.0, 1e-6) > 0.0);
        assert_eq!(interp(l, r, 50.0, 1e-6), OUT_OF_RANGE_SENTINEL);
    }

    #[test]
    fn interp_horizontal() {
        let l = Point::new(0.0, 3.0);
        let r = Point::new(10.0, 3.0);
        assert_eq!(interp(l, r, 4.0, 1e-6), 3.0);
    }

    #[test]
    fn point_on_edge_detects_collinear() {
        let l = Point::new(0.0, 0.0);
        let r = Point::new(10.0, 10.0);
        assert!(point_on_edge(l, r, Point::new(5.0, 5.0), 1e-6));
        assert!(!point_on_edge(l, r, Point::new(5.0, 5.1), 1e-6));
    }
}
