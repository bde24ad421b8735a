//! The top-level planner: owns the bounds, obstacles, vehicle, and the two
//! linked build products (trapezoid set + search DAG), and answers
//! `start -> goal` queries once built.
//!
//! References
//! - TH: `original_source/src/c_space.py`, `point_location.py`, `graph.py`
//!   composed together (no single source file owns this orchestration).

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::builder::add_line;
use crate::config::PlannerConfig;
use crate::dag::{ChildSlot, Dag};
use crate::error::{BuildError, PlanError};
use crate::geom::compute_cspace;
use crate::geom::point::Point;
use crate::geom::polygon::{Polygon, PolygonSet};
use crate::rect::Rect;
use crate::roadmap::Graph;
use crate::trapezoid::{Originators, Trapezoid, TrapezoidSet};

/// Owns a planner instance's full lifecycle: obstacles and vehicle go in,
/// `build` runs Minkowski expansion and incremental decomposition, `plan`
/// answers point-to-point queries against the result.
pub struct Planner {
    bounds: Rect,
    config: PlannerConfig,
    obstacles: Vec<Polygon>,
    vehicle: Option<Polygon>,
    trapezoids: TrapezoidSet,
    dag: Option<Dag>,
    roadmap: Option<Graph>,
}

impl Planner {
    pub fn new(bounds: Rect, seed: u64) -> Self {
        Self::with_config(bounds, PlannerConfig::with_seed(seed))
    }

    pub fn with_config(bounds: Rect, config: PlannerConfig) -> Self {
        Planner {
            bounds,
            config,
            obstacles: Vec::new(),
            vehicle: None,
            trapezoids: TrapezoidSet::new(),
            dag: None,
            roadmap: None,
        }
    }

    pub fn set_obstacles(&mut self, polygons: &[Polygon]) {
        self.obstacles = polygons.to_vec();
        self.dag = None;
        self.roadmap = None;
    }

    pub fn set_vehicle(&mut self, polygon: &Polygon) {
        self.vehicle = Some(polygon.clone());
        self.dag = None;
        self.roadmap = None;
    }

    /// Runs Minkowski expansion of every obstacle by the vehicle, then
    /// incrementally decomposes the resulting C-space polygons inside
    /// `bounds`, then removes trapezoids that fall inside a C-space
    /// obstacle, then builds the roadmap graph over what remains.
    pub fn build(&mut self) -> Result<(), BuildError> {
        let vehicle = self.vehicle.clone().unwrap_or_else(|| Polygon::new(vec![Point::new(0.0, 0.0)]));
        info!(obstacles = self.obstacles.len(), "planner build starting");

        let cspace_polygons = if vehicle.len() <= 1 {
            self.obstacles.clone()
        } else {
            compute_cspace(&self.obstacles, &vehicle)?
        };
        let cspace = PolygonSet::new(cspace_polygons);

        let mut traps = TrapezoidSet::new();
        let corners = self.bounds.corners_ccw();
        let start_trap = Trapezoid::from_vertices(&corners, Originators::empty());
        let start_idx = traps.add(start_trap);
        let mut dag = Dag::new(self.bounds.min.x, start_idx);

        let mut rng = StdRng::seed_from_u64(self.config.rng_seed);
        let edges = cspace.random_edge_sampler(&mut rng);
        debug!(edges = edges.len(), "inserting randomized edge stream");
        for (a, b) in edges {
            add_line(&mut dag, &mut traps, a, b, &self.config)?;
        }

        traps.remove_traps_within_polygons(&cspace, self.config.epsilon_intersect);
        let roadmap = Graph::build(&traps);

        info!(trapezoids = traps.trap_count(), "planner build complete");
        self.trapezoids = traps;
        self.dag = Some(dag);
        self.roadmap = Some(roadmap);
        Ok(())
    }

    /// Find a waypoint path from `start` to `goal` through free space.
    /// Requires a prior successful `build`.
    pub fn plan(&self, start: Point, goal: Point) -> Result<Vec<Point>, PlanError> {
        let dag = self.dag.as_ref().ok_or(PlanError::NotBuilt)?;
        let roadmap = self.roadmap.as_ref().ok_or(PlanError::NotBuilt)?;
        roadmap.search(dag, &self.trapezoids, start, goal, self.config.epsilon_intersect)
    }

    /// All live trapezoids as vertex polygons, for visualization.
    pub fn trapezoid_polygons(&self) -> Vec<Polygon> {
        self.trapezoids
            .iter_live()
            .map(|(_, t)| Polygon::new(vec![t.top_line.left, t.top_line.right, t.bottom_line.right, t.bottom_line.left]))
            .collect()
    }

    pub fn trapezoid_count(&self) -> usize {
        self.trapezoids.trap_count()
    }

    /// Raw point-location query: the index of the trapezoid containing `p`,
    /// ignoring whether it was later removed as inside an obstacle. `None`
    /// if `p` is outside `bounds` or the planner hasn't been built yet.
    pub fn locate(&self, p: Point) -> Option<usize> {
        let dag = self.dag.as_ref()?;
        match dag.query(p, self.config.epsilon_intersect) {
            ChildSlot::Trapezoid(idx) => Some(idx),
            _ => None,
        }
    }

    /// Every DAG node's identity and child slots, for visualization. Empty
    /// if `build` hasn't run yet.
    pub fn dag_edges(&self) -> Vec<crate::dag::DagEdgeDescriptor> {
        self.dag.as_ref().map(|d| d.edge_descriptors()).unwrap_or_default()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn config(&self) -> PlannerConfig {
        self.config
    }
}
