//! The interface graph over free-space trapezoids, and BFS pathfinding
//! through it.
//!
//! References
//! - TH: `original_source/src/graph.py` (`Interface`, `Graph`).

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::dag::{ChildSlot, Dag};
use crate::error::PlanError;
use crate::geom::point::Point;
use crate::trapezoid::{Trapezoid, TrapezoidSet};

/// The shared vertical wall between two right/left-adjacent trapezoids:
/// the overlap of their top and bottom chords at that wall's `x`, and its
/// midpoint (the waypoint a path passes through when crossing it).
#[derive(Debug, Clone, Copy)]
pub struct Interface {
    pub top: Point,
    pub bottom: Point,
    pub center: Point,
}

impl Interface {
    fn new(left: &Trapezoid, right: &Trapezoid) -> Self {
        let top = if left.top_line.right.y <= right.top_line.left.y {
            left.top_line.right
        } else {
            right.top_line.left
        };
        let bottom = if left.bottom_line.right.y >= right.bottom_line.left.y {
            left.bottom_line.right
        } else {
            right.bottom_line.left
        };
        let center = Point::new(top.x, (top.y + bottom.y) / 2.0);
        Interface { top, bottom, center }
    }
}

/// Undirected adjacency graph over free-space trapezoids, keyed by
/// trapezoid index.
#[derive(Debug, Default)]
pub struct Graph {
    interfaces: HashMap<usize, HashMap<usize, Interface>>,
}

impl Graph {
    /// Connect every live trapezoid to its right-adjacent neighbors. Unlike
    /// a BFS seeded from a single boundary trapezoid, this visits every
    /// live index directly, so disconnected free-space components (two
    /// obstacles that don't touch the bounds) still end up fully wired.
    pub fn build(traps: &TrapezoidSet) -> Self {
        let mut interfaces: HashMap<usize, HashMap<usize, Interface>> = HashMap::new();
        let mut edge_count = 0;
        for (idx, trap) in traps.iter_live() {
            for right_idx in traps.right_adjacent(idx) {
                let right_trap = traps.get(right_idx).expect("live trapezoid");
                let interface = Interface::new(trap, right_trap);
                interfaces.entry(idx).or_default().insert(right_idx, interface);
                interfaces.entry(right_idx).or_default().insert(idx, interface);
                edge_count += 1;
            }
        }
        debug!(trapezoids = traps.trap_count(), edges = edge_count, "graph built");
        Graph { interfaces }
    }

    fn neighbors(&self, idx: usize) -> impl Iterator<Item = (&usize, &Interface)> {
        self.interfaces.get(&idx).into_iter().flatten()
    }

    /// BFS from the trapezoid containing `start` to the one containing
    /// `goal`, returning a waypoint path: `start`, then each crossed
    /// interface's center, then `goal`.
    pub fn search(&self, dag: &Dag, traps: &TrapezoidSet, start: Point, goal: Point, eps: f64) -> Result<Vec<Point>, PlanError> {
        let start_idx = locate(dag, traps, start, eps)?;
        let goal_idx = locate(dag, traps, goal, eps)?;

        if start_idx == goal_idx {
            return Ok(vec![start, goal]);
        }

        let mut parents: HashMap<usize, Option<usize>> = HashMap::new();
        parents.insert(start_idx, None);
        let mut queue = VecDeque::new();
        queue.push_back(start_idx);

        while let Some(current) = queue.pop_front() {
            if current == goal_idx {
                break;
            }
            for (&next_idx, _) in self.neighbors(current) {
                if !parents.contains_key(&next_idx) {
                    parents.insert(next_idx, Some(current));
                    queue.push_back(next_idx);
                }
            }
        }

        if !parents.contains_key(&goal_idx) {
            return Err(PlanError::NoPath);
        }

        let mut chain = vec![goal_idx];
        let mut node = goal_idx;
        while let Some(&Some(parent)) = parents.get(&node) {
            chain.push(parent);
            node = parent;
        }
        chain.reverse();

        let mut waypoints = Vec::with_capacity(chain.len() + 1);
        waypoints.push(start);
        for pair in chain.windows(2) {
            let interface = self.interfaces.get(&pair[0]).and_then(|m| m.get(&pair[1])).expect("adjacent in chain");
            waypoints.push(interface.center);
        }
        waypoints.push(goal);
        Ok(waypoints)
    }
}

fn locate(dag: &Dag, traps: &TrapezoidSet, p: Point, eps: f64) -> Result<usize, PlanError> {
    match dag.query(p, eps) {
        ChildSlot::Trapezoid(idx) => {
            let trap = traps.get(idx).ok_or(PlanError::Internal("DAG leaf points at a freed trapezoid".to_string()))?;
            if trap.includes_point_loose(p, eps) {
                Ok(idx)
            } else {
                Err(PlanError::PointOutsideFreeSpace { point: p })
            }
        }
        ChildSlot::Failure => Err(PlanError::PointOutsideBounds { point: p }),
        _ => Err(PlanError::Internal("DAG query did not resolve to a leaf".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trapezoid::Originators;

    fn strip(x0: f64, x1: f64) -> Trapezoid {
        Trapezoid::from_vertices(
            &[Point::new(x0, 0.0), Point::new(x0, 10.0), Point::new(x1, 10.0), Point::new(x1, 0.0)],
            Originators::empty(),
        )
    }

    #[test]
    fn adjacent_strips_produce_one_shared_interface() {
        let mut traps = TrapezoidSet::new();
        let a = traps.add(strip(0.0, 10.0));
        let b = traps.add(strip(10.0, 20.0));
        let graph = Graph::build(&traps);
        let interface = graph.interfaces.get(&a).and_then(|m| m.get(&b)).expect("strips share a wall");
        assert_eq!(interface.top.x, 10.0);
        assert_eq!(interface.center.y, 5.0);
    }

    #[test]
    fn search_same_trapezoid_returns_direct_segment() {
        let mut traps = TrapezoidSet::new();
        let idx = traps.add(strip(0.0, 100.0));
        let dag = Dag::new(0.0, idx);
        let graph = Graph::build(&traps);

        let path = graph.search(&dag, &traps, Point::new(10.0, 5.0), Point::new(90.0, 5.0), 1e-6).unwrap();
        assert_eq!(path, vec![Point::new(10.0, 5.0), Point::new(90.0, 5.0)]);
    }

    #[test]
    fn search_point_outside_bounds_is_reported() {
        let mut traps = TrapezoidSet::new();
        let idx = traps.add(strip(0.0, 100.0));
        let dag = Dag::new(0.0, idx);
        let graph = Graph::build(&traps);

        let result = graph.search(&dag, &traps, Point::new(-10.0, 5.0), Point::new(90.0, 5.0), 1e-6);
        assert!(matches!(result, Err(PlanError::PointOutsideBounds { .. })));
    }
}
