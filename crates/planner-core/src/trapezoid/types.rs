//! A single trapezoid (or triangle) cell of the decomposition, and the
//! `split_by` operation that is the core step of incremental insertion.
//!
//! References
//! - TH: `original_source/src/trapezoids.py` (`Trapezoid`).

use crate::dag::NodeId;
use crate::geom::point::{approx_eq, interp, make_lr, Point, Segment};

/// At most two polygon-edge endpoints that induced a trapezoid's left and
/// right vertical walls, kept in left-to-right order. Used only by
/// [`crate::trapezoid::set::TrapezoidSet::try_merge`] and propagated through
/// splits; never consulted for geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Originators {
    items: [Point; 2],
    len: u8,
}

impl Originators {
    pub fn empty() -> Self {
        Originators {
            items: [Point::new(0.0, 0.0); 2],
            len: 0,
        }
    }

    pub fn from_vec(v: &[Point]) -> Self {
        debug_assert!(v.len() <= 2, "a trapezoid can have at most 2 originators");
        let mut items = [Point::new(0.0, 0.0); 2];
        for (slot, p) in items.iter_mut().zip(v.iter()) {
            *slot = *p;
        }
        Originators {
            items,
            len: v.len() as u8,
        }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.items[..self.len as usize]
    }

    pub fn first(&self) -> Option<Point> {
        self.as_slice().first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.as_slice().last().copied()
    }

    pub fn appended(&self, p: Point) -> Self {
        let mut v = self.as_slice().to_vec();
        v.push(p);
        Originators::from_vec(&v)
    }

    pub fn all_but_last(&self) -> Self {
        let s = self.as_slice();
        if s.is_empty() {
            *self
        } else {
            Originators::from_vec(&s[..s.len() - 1])
        }
    }

    pub fn all_but_first(&self) -> Self {
        let s = self.as_slice();
        if s.is_empty() {
            *self
        } else {
            Originators::from_vec(&s[1..])
        }
    }

    pub fn concat(a: &Self, b: &Self) -> Self {
        let mut v = a.as_slice().to_vec();
        v.extend_from_slice(b.as_slice());
        Originators::from_vec(&v)
    }

    pub fn contains_x(&self, x: f64, eps: f64) -> bool {
        self.as_slice().iter().any(|p| approx_eq(p.x, x, eps))
    }
}

/// A single cell of the trapezoidal decomposition.
#[derive(Debug, Clone)]
pub struct Trapezoid {
    pub top_line: Segment,
    pub bottom_line: Segment,
    pub left_p: Point,
    pub right_p: Point,
    pub originators: Originators,
    pub index: usize,
    pub parents: Vec<NodeId>,
}

/// The up-to-four children produced by [`Trapezoid::split_by`].
#[derive(Debug, Default)]
pub struct SplitResult {
    pub left: Option<Trapezoid>,
    pub right: Option<Trapezoid>,
    pub top: Option<Trapezoid>,
    pub bottom: Option<Trapezoid>,
}

impl SplitResult {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

/// Locate the vertex with extreme `y` among `vertices` (max if `top`, else
/// min), then walk to its two cyclic neighbors to find the chord's other
/// endpoint. Requires `vertices` to already be in boundary-traversal order,
/// which every caller in this module maintains by construction.
fn extreme_y_index(vertices: &[Point], top: bool) -> usize {
    let mut best = 0;
    for i in 1..vertices.len() {
        if top {
            if vertices[i].y > vertices[best].y {
                best = i;
            }
        } else if vertices[i].y < vertices[best].y {
            best = i;
        }
    }
    best
}

fn find_chord(vertices: &[Point], top: bool) -> Segment {
    let n = vertices.len();
    let extreme = extreme_y_index(vertices, top);
    let start = vertices[extreme];
    let left = vertices[(extreme + n - 1) % n];
    let right = vertices[(extreme + 1) % n];

    let left_vertical = approx_eq(left.x, start.x, 1e-9);
    let right_vertical = approx_eq(right.x, start.x, 1e-9);
    let end = if left_vertical {
        right
    } else if right_vertical {
        left
    } else if top {
        if left.y >= right.y {
            left
        } else {
            right
        }
    } else if left.y <= right.y {
        left
    } else {
        right
    };
    make_lr(start, end)
}

impl Trapezoid {
    /// Build a trapezoid from an unordered-but-cyclically-consistent vertex
    /// list (3 or 4 points walking the boundary), deriving `top_line`,
    /// `bottom_line`, `left_p`, and `right_p` from it.
    pub fn from_vertices(vertices: &[Point], originators: Originators) -> Self {
        debug_assert!(vertices.len() == 3 || vertices.len() == 4);
        let top_line = find_chord(vertices, true);
        let bottom_line = find_chord(vertices, false);
        let mut left_p = vertices[0];
        let mut right_p = vertices[0];
        for &p in &vertices[1..] {
            if p.x < left_p.x {
                left_p = p;
            }
            if p.x > right_p.x {
                right_p = p;
            }
        }
        Trapezoid {
            top_line,
            bottom_line,
            left_p,
            right_p,
            originators,
            index: 0,
            parents: Vec::new(),
        }
    }

    pub fn set_idx(&mut self, i: usize) {
        self.index = i;
    }

    pub fn add_parent(&mut self, parent: NodeId) {
        self.parents.push(parent);
    }

    pub fn top(&self) -> Segment {
        self.top_line
    }

    pub fn bottom(&self) -> Segment {
        self.bottom_line
    }

    /// True iff `edge` (left-to-right) passes through this trapezoid's
    /// interior or boundary, within `eps`.
    pub fn is_intersected(&self, edge: Segment, eps: f64) -> bool {
        let (top_left_ok, bottom_left_ok) = if edge.left.x < self.top_line.left.x {
            (
                interp(edge.left, edge.right, self.top_line.left.x, eps) <= self.top_line.left.y + eps,
                interp(edge.left, edge.right, self.bottom_line.left.x, eps) >= self.bottom_line.left.y - eps,
            )
        } else {
            (
                edge.left.y <= interp(self.top_line.left, self.top_line.right, edge.left.x, eps) + eps,
                edge.left.y >= interp(self.bottom_line.left, self.bottom_line.right, edge.left.x, eps) - eps,
            )
        };
        if !top_left_ok || !bottom_left_ok {
            return false;
        }

        let (top_right_ok, bottom_right_ok) = if edge.right.x > self.top_line.right.x {
            (
                interp(edge.left, edge.right, self.top_line.right.x, eps) <= self.top_line.right.y + eps,
                interp(edge.left, edge.right, self.bottom_line.right.x, eps) >= self.bottom_line.right.y - eps,
            )
        } else {
            (
                edge.right.y <= interp(self.top_line.left, self.top_line.right, edge.right.x, eps) + eps,
                edge.right.y >= interp(self.bottom_line.left, self.bottom_line.right, edge.right.x, eps) - eps,
            )
        };
        if !top_right_ok || !bottom_right_ok {
            return false;
        }

        if edge.right.x <= self.left_p.x {
            return false;
        }
        if edge.left.x >= self.right_p.x {
            return false;
        }
        true
    }

    pub fn includes_point_loose(&self, p: Point, eps: f64) -> bool {
        if p.x < self.left_p.x || p.x > self.right_p.x {
            return false;
        }
        let y_upper = interp(self.top_line.left, self.top_line.right, p.x, eps);
        let y_lower = interp(self.bottom_line.left, self.bottom_line.right, p.x, eps);
        !(p.y < y_lower - eps || p.y > y_upper + eps)
    }

    pub fn includes_point(&self, p: Point, eps: f64) -> bool {
        if p.x <= self.left_p.x || p.x >= self.right_p.x {
            return false;
        }
        let y_upper = interp(self.top_line.left, self.top_line.right, p.x, eps);
        let y_lower = interp(self.bottom_line.left, self.bottom_line.right, p.x, eps);
        !(p.y <= y_lower || p.y >= y_upper)
    }

    pub fn is_left_pointed(&self) -> bool {
        self.top_line.left.y == self.bottom_line.left.y
    }

    pub fn is_right_pointed(&self) -> bool {
        self.top_line.right.y == self.bottom_line.right.y
    }

    /// Split this trapezoid by `edge`, producing up to four children keyed
    /// by position. Empty if `edge` doesn't intersect.
    pub fn split_by(&self, edge: Segment, eps: f64) -> SplitResult {
        let mut result = SplitResult::default();
        if !self.is_intersected(edge, eps) {
            return result;
        }

        let mut curr = self.clone();

        for is_left in [true, false] {
            let ep = if is_left { edge.left } else { edge.right };
            if !curr.includes_point(ep, eps) {
                continue;
            }

            let top_point = Point::new(ep.x, interp(curr.top_line.left, curr.top_line.right, ep.x, eps));
            let bottom_point = Point::new(ep.x, interp(curr.bottom_line.left, curr.bottom_line.right, ep.x, eps));

            let (same_bottom, same_top, other_bottom, other_top) = if is_left {
                (curr.bottom_line.left, curr.top_line.left, curr.bottom_line.right, curr.top_line.right)
            } else {
                (curr.bottom_line.right, curr.top_line.right, curr.bottom_line.left, curr.top_line.left)
            };

            let mut piece_verts = vec![top_point, bottom_point, same_bottom];
            if same_top.y != same_bottom.y {
                piece_verts.push(same_top);
            }
            let mut leftover_verts = vec![top_point, bottom_point, other_bottom];
            if other_top.y != other_bottom.y {
                leftover_verts.push(other_top);
            }

            let mut piece_originators = Vec::new();
            let mut leftover_originators = Vec::new();
            for o in curr.originators.as_slice() {
                if piece_verts.iter().any(|v| approx_eq(v.x, o.x, eps)) {
                    piece_originators.push(*o);
                }
                if leftover_verts.iter().any(|v| approx_eq(v.x, o.x, eps)) {
                    leftover_originators.push(*o);
                }
            }
            piece_originators.push(ep);
            leftover_originators.push(ep);

            let piece = Trapezoid::from_vertices(&piece_verts, Originators::from_vec(&piece_originators));
            if is_left {
                result.left = Some(piece);
            } else {
                result.right = Some(piece);
            }

            curr = Trapezoid::from_vertices(&leftover_verts, Originators::from_vec(&leftover_originators));
        }

        if edge.left.x < edge.right.x {
            let center_left = Point::new(curr.left_p.x, interp(edge.left, edge.right, curr.left_p.x, eps));
            let center_right = Point::new(curr.right_p.x, interp(edge.left, edge.right, curr.right_p.x, eps));

            let top_verts = vec![center_right, center_left, curr.top_line.left, curr.top_line.right];
            let bottom_verts = vec![center_right, center_left, curr.bottom_line.left, curr.bottom_line.right];

            let mut top_originators = Vec::new();
            let mut bottom_originators = Vec::new();
            for o in curr.originators.as_slice() {
                if top_verts.iter().any(|v| approx_eq(v.x, o.x, eps)) {
                    top_originators.push(*o);
                }
                if bottom_verts.iter().any(|v| approx_eq(v.x, o.x, eps)) {
                    bottom_originators.push(*o);
                }
            }

            result.top = Some(Trapezoid::from_vertices(&top_verts, Originators::from_vec(&top_originators)));
            result.bottom = Some(Trapezoid::from_vertices(&bottom_verts, Originators::from_vec(&bottom_originators)));
        } else if result.left.is_some() {
            // Vertical edge: the remaining center piece becomes `right`.
            result.right = Some(curr);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds_trap() -> Trapezoid {
        Trapezoid::from_vertices(
            &[
                Point::new(0.0, 0.0),
                Point::new(0.0, 800.0),
                Point::new(800.0, 800.0),
                Point::new(800.0, 0.0),
            ],
            Originators::empty(),
        )
    }

    #[test]
    fn bounds_trapezoid_is_not_pointed() {
        let t = bounds_trap();
        assert!(!t.is_left_pointed());
        assert!(!t.is_right_pointed());
        assert_eq!(t.left_p.x, 0.0);
        assert_eq!(t.right_p.x, 800.0);
    }

    #[test]
    fn includes_point_strict_excludes_boundary() {
        let t = bounds_trap();
        assert!(t.includes_point(Point::new(400.0, 400.0), 1e-6));
        assert!(!t.includes_point(Point::new(0.0, 400.0), 1e-6));
        assert!(t.includes_point_loose(Point::new(0.0, 400.0), 1e-6));
    }

    #[test]
    fn split_by_triangle_edge_produces_top_and_bottom() {
        let t = bounds_trap();
        let edge = Segment::new(Point::new(200.0, 100.0), Point::new(280.0, 100.0));
        let split = t.split_by(edge, 1e-6);
        assert!(split.left.is_some());
        assert!(split.right.is_some());
        assert!(split.top.is_some());
        assert!(split.bottom.is_some());
    }

    #[test]
    fn split_by_non_intersecting_edge_is_empty() {
        let t = Trapezoid::from_vertices(
            &[
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 0.0),
            ],
            Originators::empty(),
        );
        let edge = Segment::new(Point::new(100.0, 100.0), Point::new(110.0, 100.0));
        assert!(t.split_by(edge, 1e-6).is_empty());
    }
}
