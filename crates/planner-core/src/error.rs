//! Typed errors for the build and query phases.
//!
//! Replaces the source's bare `assert`s and `ValueError` raises with
//! `thiserror`-derived enums that carry enough context to log usefully and
//! propagate with `?`. `Internal` variants are reserved for invariant
//! violations that indicate a bug in this crate rather than bad caller
//! input; they are fatal to the planner instance, never to the process.

use thiserror::Error;

use crate::geom::point::Point;

/// Errors that can occur while constructing the C-space trapezoidal map.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("obstacle polygon {index} is degenerate (fewer than 3 vertices, non-convex, or collinear)")]
    DegenerateInput { index: usize },

    #[error("vehicle polygon is degenerate (fewer than 3 vertices, non-convex, or collinear)")]
    DegenerateVehicle,

    #[error("obstacle polygons overlap: edge insertion re-entered an already-decomposed region without a containing trapezoid")]
    OverlappingPolygons,

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

/// Errors that can occur while answering a `start -> goal` query.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("point {point:?} lies outside the planner's bounds")]
    PointOutsideBounds { point: Point },

    #[error("point {point:?} lies inside a configuration-space obstacle")]
    PointOutsideFreeSpace { point: Point },

    #[error("no path exists between the queried points")]
    NoPath,

    #[error("planner has not been built yet")]
    NotBuilt,

    #[error("internal invariant violated: {0}")]
    Internal(String),
}
