//! The live collection of trapezoids: an arena with free-list slot reuse
//! plus the `by_left_x`/`by_right_x` indices used for O(log k) adjacency
//! lookups.
//!
//! References
//! - TH: `original_source/src/trapezoids.py` (`Trapezoids`).

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::dag::NodeId;
use crate::geom::point::Segment;
use crate::geom::polygon::PolygonSet;

use super::types::{Originators, SplitResult, Trapezoid};

/// Which of a split's up-to-four children a [`SplitIndices`] slot refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKey {
    Left,
    Right,
    Top,
    Bottom,
}

/// Post-insertion indices of a single trapezoid's split children, after
/// [`TrapezoidSet::add_and_check_merges`] has resolved merges.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitIndices {
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub top: Option<usize>,
    pub bottom: Option<usize>,
}

impl SplitIndices {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }

    pub fn get(&self, key: SplitKey) -> Option<usize> {
        match key {
            SplitKey::Left => self.left,
            SplitKey::Right => self.right,
            SplitKey::Top => self.top,
            SplitKey::Bottom => self.bottom,
        }
    }

    fn set(&mut self, key: SplitKey, value: usize) {
        match key {
            SplitKey::Left => self.left = Some(value),
            SplitKey::Right => self.right = Some(value),
            SplitKey::Top => self.top = Some(value),
            SplitKey::Bottom => self.bottom = Some(value),
        }
    }
}

/// Arena of trapezoid slots (nullable, reused via a free-list within one
/// build) plus the two adjacency indices.
#[derive(Debug, Default)]
pub struct TrapezoidSet {
    trapezoids: Vec<Option<Trapezoid>>,
    free_list: Vec<usize>,
    by_left_x: BTreeMap<OrderedFloat<f64>, BTreeMap<OrderedFloat<f64>, usize>>,
    by_right_x: BTreeMap<OrderedFloat<f64>, BTreeMap<OrderedFloat<f64>, usize>>,
}

impl TrapezoidSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, idx: usize) -> Option<&Trapezoid> {
        self.trapezoids.get(idx).and_then(|o| o.as_ref())
    }

    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &Trapezoid)> {
        self.trapezoids.iter().enumerate().filter_map(|(i, t)| t.as_ref().map(|t| (i, t)))
    }

    pub fn trap_count(&self) -> usize {
        self.iter_live().count()
    }

    /// Record that `parent` now points at trapezoid `idx` as one of its
    /// leaf children. Used by the builder while patching the DAG after a
    /// split; a merged trapezoid accumulates parents from both halves.
    pub fn add_parent(&mut self, idx: usize, parent: NodeId) {
        self.trapezoids[idx]
            .as_mut()
            .expect("live trapezoid")
            .add_parent(parent);
    }

    fn index_insert(&mut self, trap: &Trapezoid, idx: usize) {
        if !trap.is_left_pointed() {
            self.by_left_x
                .entry(OrderedFloat(trap.left_p.x))
                .or_default()
                .insert(OrderedFloat(trap.bottom_line.left.y), idx);
        }
        if !trap.is_right_pointed() {
            self.by_right_x
                .entry(OrderedFloat(trap.right_p.x))
                .or_default()
                .insert(OrderedFloat(trap.top_line.right.y), idx);
        }
    }

    fn index_remove(&mut self, trap: &Trapezoid) {
        if !trap.is_left_pointed() {
            if let Some(inner) = self.by_left_x.get_mut(&OrderedFloat(trap.left_p.x)) {
                inner.remove(&OrderedFloat(trap.bottom_line.left.y));
            }
        }
        if !trap.is_right_pointed() {
            if let Some(inner) = self.by_right_x.get_mut(&OrderedFloat(trap.right_p.x)) {
                inner.remove(&OrderedFloat(trap.top_line.right.y));
            }
        }
    }

    /// Add a trapezoid, reusing the most recently freed slot if one exists.
    pub fn add(&mut self, mut trap: Trapezoid) -> usize {
        let idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            self.trapezoids.push(None);
            self.trapezoids.len() - 1
        };
        trap.set_idx(idx);
        self.index_insert(&trap, idx);
        self.trapezoids[idx] = Some(trap);
        idx
    }

    /// Null slot `idx`, removing it from both adjacency indices and marking
    /// it free for reuse.
    pub fn pop(&mut self, idx: usize) {
        if let Some(trap) = self.trapezoids[idx].take() {
            self.index_remove(&trap);
        }
        self.free_list.push(idx);
    }

    /// Replace slot `idx`'s contents in place, re-indexing as needed.
    pub fn update_idx(&mut self, idx: usize, mut trap: Trapezoid) {
        if let Some(old) = self.trapezoids[idx].take() {
            self.index_remove(&old);
        }
        trap.set_idx(idx);
        self.index_insert(&trap, idx);
        self.trapezoids[idx] = Some(trap);
    }

    /// Trapezoids sharing trapezoid `index`'s right wall.
    pub fn right_adjacent(&self, index: usize) -> Vec<usize> {
        let trap = self.trapezoids[index].as_ref().expect("live trapezoid");
        let Some(choices) = self.by_left_x.get(&OrderedFloat(trap.right_p.x)) else {
            return Vec::new();
        };
        if choices.is_empty() {
            return Vec::new();
        }
        let entries: Vec<(OrderedFloat<f64>, usize)> = choices.iter().map(|(&k, &v)| (k, v)).collect();
        let target = OrderedFloat(trap.top_line.right.y);
        let mut idx = entries.partition_point(|&(k, _)| k < target);
        if idx == entries.len() {
            idx -= 1;
        }

        let mut result = Vec::new();
        loop {
            let cand_idx = entries[idx].1;
            let cand = self.trapezoids[cand_idx].as_ref().expect("live trapezoid");
            if trap.bottom_line.right.y > cand.top_line.left.y {
                break;
            }
            if trap.top_line.right.y >= cand.bottom_line.left.y {
                result.push(cand_idx);
            }
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        result
    }

    /// Trapezoids sharing trapezoid `index`'s left wall. Mirrors
    /// [`Self::right_adjacent`] over `by_right_x`; exercised by the adjacency
    /// symmetry property test rather than by the builder itself.
    pub fn left_adjacent(&self, index: usize) -> Vec<usize> {
        let trap = self.trapezoids[index].as_ref().expect("live trapezoid");
        let Some(choices) = self.by_right_x.get(&OrderedFloat(trap.left_p.x)) else {
            return Vec::new();
        };
        if choices.is_empty() {
            return Vec::new();
        }
        let entries: Vec<(OrderedFloat<f64>, usize)> = choices.iter().map(|(&k, &v)| (k, v)).collect();
        let target = OrderedFloat(trap.bottom_line.left.y);
        let mut idx = entries.partition_point(|&(k, _)| k < target);
        if idx == entries.len() {
            if idx == 0 {
                return Vec::new();
            }
            idx -= 1;
        }

        let mut result = Vec::new();
        loop {
            let cand_idx = entries[idx].1;
            let cand = self.trapezoids[cand_idx].as_ref().expect("live trapezoid");
            if trap.top_line.left.y < cand.bottom_line.right.y {
                break;
            }
            if trap.bottom_line.left.y <= cand.top_line.right.y {
                result.push(cand_idx);
            }
            idx += 1;
            if idx >= entries.len() {
                break;
            }
        }
        result
    }

    pub fn split_trapezoids(&self, edge: Segment, indices: &[usize], eps: f64) -> Vec<SplitResult> {
        indices
            .iter()
            .map(|&idx| {
                let trap = self.trapezoids[idx].as_ref().expect("live trapezoid");
                trap.split_by(edge, eps)
            })
            .collect()
    }

    /// Insert every split's children, then attempt to merge each of
    /// `{top, bottom}` with the matching child of the previous split.
    pub fn add_and_check_merges(&mut self, splits: Vec<SplitResult>, eps_merge: f64) -> Vec<SplitIndices> {
        let mut indices: Vec<SplitIndices> = Vec::with_capacity(splits.len());
        for split in splits {
            let mut si = SplitIndices::default();
            if let Some(t) = split.left {
                si.left = Some(self.add(t));
            }
            if let Some(t) = split.right {
                si.right = Some(self.add(t));
            }
            if let Some(t) = split.top {
                si.top = Some(self.add(t));
            }
            if let Some(t) = split.bottom {
                si.bottom = Some(self.add(t));
            }
            indices.push(si);
        }

        for i in 1..indices.len() {
            let (before, after) = indices.split_at_mut(i);
            let last = &mut before[i - 1];
            let curr = &mut after[0];
            for key in [SplitKey::Top, SplitKey::Bottom] {
                let (Some(last_idx), Some(curr_idx)) = (last.get(key), curr.get(key)) else {
                    continue;
                };
                let merged = {
                    let left_trap = self.trapezoids[last_idx].as_ref().expect("live trapezoid");
                    let right_trap = self.trapezoids[curr_idx].as_ref().expect("live trapezoid");
                    Self::try_merge(left_trap, right_trap, eps_merge)
                };
                if let Some(merged) = merged {
                    self.pop(curr_idx);
                    curr.set(key, last_idx);
                    self.update_idx(last_idx, merged);
                }
            }
        }
        indices
    }

    /// Attempt to merge two adjacent trapezoids split by the same edge
    /// insertion. See `SPEC_FULL.md` §4.E for the four legality conditions.
    pub fn try_merge(left: &Trapezoid, right: &Trapezoid, eps_merge: f64) -> Option<Trapezoid> {
        let (l_last, r_first) = (left.originators.last()?, right.originators.first()?);
        if l_last != r_first {
            return None;
        }

        let left_merger = [left.top_line.right, left.bottom_line.right];
        let right_merger = [right.top_line.left, right.bottom_line.left];
        if !points_close(left_merger[0], right_merger[0], eps_merge) || !points_close(left_merger[1], right_merger[1], eps_merge) {
            return None;
        }

        if !allclose(left.top_line.slope(), right.top_line.slope()) || !allclose(left.bottom_line.slope(), right.bottom_line.slope()) {
            return None;
        }

        let originator_y = l_last.y;
        let all_le = left_merger.iter().all(|p| p.y <= originator_y);
        let all_ge = left_merger.iter().all(|p| p.y >= originator_y);
        if !(all_le || all_ge) {
            return None;
        }

        let mut verts = vec![left.top_line.left, right.top_line.right];
        if right.bottom_line.right.y != right.top_line.right.y {
            verts.push(right.bottom_line.right);
        }
        if left.bottom_line.left.y != left.top_line.left.y {
            verts.push(left.bottom_line.left);
        }

        let new_originators = Originators::concat(&left.originators.all_but_last(), &right.originators.all_but_first());
        Some(Trapezoid::from_vertices(&verts, new_originators))
    }

    /// Pop every live trapezoid whose four vertices all lie on the boundary
    /// of some polygon in `polygons`.
    pub fn remove_traps_within_polygons(&mut self, polygons: &PolygonSet, eps: f64) {
        let to_remove: Vec<usize> = self
            .iter_live()
            .filter(|(_, t)| {
                let pts = [t.top_line.left, t.top_line.right, t.bottom_line.left, t.bottom_line.right];
                polygons.contains_trap(&pts, eps)
            })
            .map(|(i, _)| i)
            .collect();
        for idx in to_remove {
            self.pop(idx);
        }
    }
}

fn points_close(a: crate::geom::point::Point, b: crate::geom::point::Point, eps: f64) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps
}

/// `numpy.allclose`'s default formula: `|a - b| <= atol + rtol * |b|`.
fn allclose(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}
