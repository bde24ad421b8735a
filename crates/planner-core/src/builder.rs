//! Incremental insertion of a single edge into the trapezoidal map and its
//! point-location DAG: chain discovery, split, merge, and DAG patch.
//!
//! References
//! - TH: `original_source/src/point_location.py` (`PointLocator.add_line`,
//!   `PointLocator.pop_leaf`).

use tracing::{debug, trace, warn};

use crate::config::PlannerConfig;
use crate::dag::{ChildSlot, Dag, NodeId};
use crate::error::BuildError;
use crate::geom::point::{Point, Segment};
use crate::trapezoid::set::SplitKey;
use crate::trapezoid::TrapezoidSet;

fn expect_trap(slot: ChildSlot) -> Result<usize, BuildError> {
    match slot {
        ChildSlot::Trapezoid(idx) => Ok(idx),
        _ => Err(BuildError::Internal(
            "edge endpoint located outside the bounding rectangle during build".to_string(),
        )),
    }
}

/// Insert the edge `a -> b` into the map, splitting and merging trapezoids
/// along its length and patching the search DAG to match.
pub fn add_line(dag: &mut Dag, traps: &mut TrapezoidSet, a: Point, b: Point, config: &PlannerConfig) -> Result<(), BuildError> {
    let edge = Segment::new(a, b);
    let eps = config.epsilon_intersect;
    debug!(left = ?edge.left, right = ?edge.right, "add_line");

    let left_trap = expect_trap(dag.query(edge.left, eps))?;
    let right_trap = expect_trap(dag.query(edge.right, eps))?;

    let mut intersected = vec![left_trap];
    if left_trap != right_trap {
        let mut current = left_trap;
        let mut contains_right = false;
        loop {
            let neighbors = traps.right_adjacent(current);
            let mut advanced = false;
            for cand in neighbors {
                let cand_trap = traps.get(cand).expect("live trapezoid");
                trace!(candidate = cand, "chain discovery candidate");
                if cand_trap.is_intersected(edge, eps) {
                    intersected.push(cand);
                    current = cand;
                    advanced = true;
                    break;
                }
            }
            let last_idx = *intersected.last().unwrap();
            if traps.get(last_idx).expect("live trapezoid").includes_point_loose(edge.right, eps) {
                contains_right = true;
                break;
            }
            if !advanced {
                break;
            }
        }
        if !contains_right {
            warn!("chain discovery terminated without containing the edge's right endpoint");
            return Err(BuildError::OverlappingPolygons);
        }
    }

    let splits = traps.split_trapezoids(edge, &intersected, eps);

    let mut parent_lists: Vec<Option<Vec<NodeId>>> = Vec::with_capacity(intersected.len());
    for (i, &idx) in intersected.iter().enumerate() {
        if splits[i].is_empty() {
            parent_lists.push(None);
            continue;
        }
        let parents = traps.get(idx).expect("live trapezoid").parents.clone();
        traps.pop(idx);
        for &p in &parents {
            dag.detach_leaf(p, idx)?;
        }
        parent_lists.push(Some(parents));
    }

    let split_indices = traps.add_and_check_merges(splits, config.epsilon_merge);

    for (i, parents) in parent_lists.into_iter().enumerate() {
        let Some(parents) = parents else { continue };
        let si = split_indices[i];

        let root_node = if edge.left.x < edge.right.x {
            let top_idx = si.get(SplitKey::Top).expect("non-vertical split always yields top");
            let bottom_idx = si.get(SplitKey::Bottom).expect("non-vertical split always yields bottom");
            let inner = dag.push_y(edge, ChildSlot::Trapezoid(top_idx), ChildSlot::Trapezoid(bottom_idx));
            traps.add_parent(top_idx, inner);
            traps.add_parent(bottom_idx, inner);

            let mut current = inner;
            if let Some(right_idx) = si.get(SplitKey::Right) {
                let node = dag.push_x(edge.right.x, ChildSlot::Node(current), ChildSlot::Trapezoid(right_idx));
                traps.add_parent(right_idx, node);
                current = node;
            }
            if let Some(left_idx) = si.get(SplitKey::Left) {
                let node = dag.push_x(edge.left.x, ChildSlot::Trapezoid(left_idx), ChildSlot::Node(current));
                traps.add_parent(left_idx, node);
                current = node;
            }
            current
        } else {
            let left_idx = si.get(SplitKey::Left).expect("vertical split always yields left");
            let right_idx = si.get(SplitKey::Right).expect("vertical split always yields right");
            let node = dag.push_x(edge.left.x, ChildSlot::Trapezoid(left_idx), ChildSlot::Trapezoid(right_idx));
            traps.add_parent(left_idx, node);
            traps.add_parent(right_idx, node);
            node
        };

        for p in parents {
            dag.set_value(p, ChildSlot::Node(root_node))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Rect;

    fn fresh(bounds: Rect) -> (Dag, TrapezoidSet) {
        let mut traps = TrapezoidSet::new();
        let corners = bounds.corners_ccw();
        let start = crate::trapezoid::Trapezoid::from_vertices(&corners, crate::trapezoid::Originators::empty());
        let idx = traps.add(start);
        (Dag::new(bounds.min.x, idx), traps)
    }

    #[test]
    fn single_triangle_produces_eight_trapezoids() {
        let bounds = Rect::from_corners(0.0, 0.0, 800.0, 800.0);
        let (mut dag, mut traps) = fresh(bounds);
        let config = PlannerConfig::default();

        let a = Point::new(200.0, 100.0);
        let b = Point::new(240.0, 30.0);
        let c = Point::new(280.0, 100.0);

        add_line(&mut dag, &mut traps, a, b, &config).unwrap();
        add_line(&mut dag, &mut traps, b, c, &config).unwrap();
        add_line(&mut dag, &mut traps, c, a, &config).unwrap();

        assert_eq!(traps.trap_count(), 8);
    }

    #[test]
    fn query_after_insertion_locates_correct_trapezoid() {
        let bounds = Rect::from_corners(0.0, 0.0, 800.0, 800.0);
        let (mut dag, mut traps) = fresh(bounds);
        let config = PlannerConfig::default();

        add_line(&mut dag, &mut traps, Point::new(200.0, 100.0), Point::new(280.0, 100.0), &config).unwrap();

        let slot = dag.query(Point::new(10.0, 10.0), config.epsilon_intersect);
        assert!(matches!(slot, ChildSlot::Trapezoid(_)));
    }

    #[test]
    fn overlapping_obstacles_surface_overlapping_polygons() {
        let bounds = Rect::from_corners(0.0, 0.0, 100.0, 100.0);
        let (mut dag, mut traps) = fresh(bounds);
        let config = PlannerConfig::default();

        // Two overlapping squares: second square's edges re-enter the first
        // square's already carved-out interior without a containing
        // trapezoid on the chain.
        add_line(&mut dag, &mut traps, Point::new(10.0, 10.0), Point::new(50.0, 10.0), &config).unwrap();
        add_line(&mut dag, &mut traps, Point::new(50.0, 10.0), Point::new(50.0, 50.0), &config).unwrap();
        add_line(&mut dag, &mut traps, Point::new(50.0, 50.0), Point::new(10.0, 50.0), &config).unwrap();
        add_line(&mut dag, &mut traps, Point::new(10.0, 50.0), Point::new(10.0, 10.0), &config).unwrap();

        let result = add_line(&mut dag, &mut traps, Point::new(30.0, 30.0), Point::new(70.0, 30.0), &config);
        assert!(matches!(result, Err(BuildError::OverlappingPolygons)));
    }
}
