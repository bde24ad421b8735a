//! Linear-time Minkowski sum of two convex polygons, inflating an obstacle
//! by a vehicle shape to produce a configuration-space (C-space) obstacle.
//!
//! References
//! - TH: `original_source/src/c_space.py` (`minkowski_sum_fast`).
//! - Code cross-refs: `polygon::Polygon::edge_angles`.

use super::point::Point;
use super::polygon::Polygon;
use crate::error::BuildError;

/// Minkowski-sum `obstacle (+) reflect(vehicle)` in `O(m + n)`, where `m`
/// and `n` are the vertex counts. Both inputs must be convex polygons with
/// >= 3 vertices; violating this returns `DegenerateInput`/`DegenerateVehicle`.
pub fn minkowski_sum(obstacle: &Polygon, vehicle: &Polygon, obstacle_index: usize) -> Result<Polygon, BuildError> {
    if !obstacle.assert_convex_len() {
        return Err(BuildError::DegenerateInput { index: obstacle_index });
    }
    if !vehicle.assert_convex_len() {
        return Err(BuildError::DegenerateVehicle);
    }

    // Reflect the vehicle through the origin, then orient both CCW.
    let mut vehicle = Polygon::new(vehicle.vertices.iter().map(|p| -p).collect());
    let mut obstacle = obstacle.clone();
    vehicle.counter_clockwise();
    obstacle.counter_clockwise();

    let (vehicle_angles, mut v_start) = vehicle.edge_angles();
    let (obstacle_angles, o_start) = obstacle.edge_angles();
    let vehicle_edges = vehicle.edges();
    let obstacle_edges = obstacle.edges();

    let mut last_angle = obstacle_angles[o_start];
    // Advance the vehicle cursor to the first edge whose angle is not
    // behind the obstacle's starting angle.
    while vehicle_angles[v_start] < last_angle {
        v_start = (v_start + 1) % vehicle_angles.len();
    }

    let mut output = vec![obstacle_edges[o_start].0, obstacle_edges[o_start].1];
    let mut o_idx = 1usize;
    let mut v_idx = 0usize;
    let total_steps = vehicle_angles.len() + obstacle_angles.len();
    let two_pi = 2.0 * std::f64::consts::PI;

    for _ in 1..total_steps {
        let curr_v = (v_idx + v_start) % vehicle_angles.len();
        let curr_o = (o_idx + o_start) % obstacle_angles.len();
        let angle_v = vehicle_angles[curr_v];
        let angle_o = obstacle_angles[curr_o];

        let mut diff_v = angle_v - last_angle;
        let mut diff_o = angle_o - last_angle;
        if diff_v < 0.0 {
            diff_v += two_pi;
        }
        if diff_o < 0.0 {
            diff_o += two_pi;
        }

        let (edge, is_vehicle) = if diff_v < diff_o {
            (vehicle_edges[curr_v], true)
        } else {
            (obstacle_edges[curr_o], false)
        };
        if is_vehicle {
            v_idx += 1;
            last_angle = angle_v;
        } else {
            o_idx += 1;
            last_angle = angle_o;
        }
        let edge_vector = edge.1 - edge.0;
        let last = *output.last().unwrap();
        output.push(last + edge_vector);
    }

    if output.len() > 1 && (output[0] - *output.last().unwrap()).norm() < 1e-9 {
        output.pop();
    }

    let sum_polygon = Polygon::new(output);
    let corner_offset = vehicle.vertex_centroid() - vehicle.top_left_vertex();
    let minkowski_offset_location = sum_polygon.top_left_vertex() + corner_offset;
    let shift = minkowski_offset_location - obstacle.top_left_vertex();

    let shifted = sum_polygon.vertices.iter().map(|p| p - shift).collect();
    Ok(Polygon::new(shifted))
}

/// Compute the C-space obstacle set for every obstacle in `obstacles`,
/// inflated by `vehicle`.
pub fn compute_cspace(obstacles: &[Polygon], vehicle: &Polygon) -> Result<Vec<Polygon>, BuildError> {
    obstacles
        .iter()
        .enumerate()
        .map(|(i, o)| minkowski_sum(o, vehicle, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(pts: &[(f64, f64)]) -> Polygon {
        Polygon::new(pts.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[test]
    fn point_vehicle_is_idempotent() {
        let obstacle = poly(&[(200.0, 100.0), (280.0, 100.0), (240.0, 30.0)]);
        let vehicle = poly(&[(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        // A degenerate single-point "polygon" can't satisfy `is_convex`
        // with repeated vertices, so approximate the point-vehicle law with
        // a vanishingly small triangle instead.
        let vehicle = poly(&[
            (vehicle.vertices[0].x, vehicle.vertices[0].y),
            (1e-7, 0.0),
            (0.0, 1e-7),
        ]);
        let result = minkowski_sum(&obstacle, &vehicle, 0).expect("convex inputs");
        assert_eq!(result.len(), obstacle.len() + vehicle.len());
    }

    #[test]
    fn square_plus_triangle_matches_known_shape() {
        let square = poly(&[(400.0, 50.0), (800.0, 50.0), (800.0, 200.0), (400.0, 200.0)]);
        let triangle = poly(&[(200.0, 100.0), (300.0, 100.0), (250.0, 10.0)]);
        let result = minkowski_sum(&square, &triangle, 0).expect("convex inputs");
        assert_eq!(result.len(), 7);

        let expected = [
            (400.0, 260.0),
            (800.0, 260.0),
            (850.0, 170.0),
            (850.0, 20.0),
            (450.0, 20.0),
            (350.0, 20.0),
            (350.0, 170.0),
        ];
        // Up to cyclic rotation: find a rotation offset that matches the
        // first expected vertex, then compare the rest.
        let start = result
            .vertices
            .iter()
            .position(|p| (p.x - expected[0].0).abs() < 1.0 && (p.y - expected[0].1).abs() < 1.0)
            .expect("expected starting vertex present");
        for (i, &(ex, ey)) in expected.iter().enumerate() {
            let p = result.vertices[(start + i) % result.len()];
            assert!((p.x - ex).abs() < 1.0, "x mismatch at {i}: {p:?} vs ({ex},{ey})");
            assert!((p.y - ey).abs() < 1.0, "y mismatch at {i}: {p:?} vs ({ex},{ey})");
        }
    }

    #[test]
    fn rejects_non_convex_obstacle() {
        let obstacle = poly(&[(0.0, 0.0), (2.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.0, 2.0)]);
        let vehicle = poly(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(matches!(
            minkowski_sum(&obstacle, &vehicle, 3),
            Err(BuildError::DegenerateInput { index: 3 })
        ));
    }
}
