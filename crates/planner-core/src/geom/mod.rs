//! Core 2D geometry: points/segments, polygons, random scenario generation,
//! and Minkowski-sum obstacle inflation.

pub mod minkowski;
pub mod point;
pub mod polygon;
pub mod rand;

pub use minkowski::{compute_cspace, minkowski_sum};
pub use point::{approx_eq, point_approx_eq, Point, Segment};
pub use polygon::{convex_hull, Polygon, PolygonSet};
pub use rand::{random_convex_polygon, random_disjoint_polygon_set};
