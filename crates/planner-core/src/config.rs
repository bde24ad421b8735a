//! Planner-wide configuration: RNG seed and numerical tolerances.
//!
//! Centralizing these the way the teacher's `GeomCfg` centralizes its
//! epsilons keeps the three tolerances separate by contract (see
//! `SPEC_FULL.md` §9, "Numerical tolerance") instead of collapsing them into
//! one constant, which produces both false merge-positives and false
//! intersection-negatives.

/// Planner configuration: RNG seed plus the two tolerances used throughout
/// trapezoid construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Seed for the deterministic edge-insertion order (§4.G). Same seed +
    /// same inputs => same DAG shape (not just the same trapezoid set).
    pub rng_seed: u64,
    /// Tolerance for chord/edge comparisons in `is_intersected` and
    /// `includes_point_loose`.
    pub epsilon_intersect: f64,
    /// Tolerance for merge-candidate wall comparisons in `try_merge`.
    pub epsilon_merge: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0,
            epsilon_intersect: 1e-6,
            epsilon_merge: 1e-1,
        }
    }
}

impl PlannerConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng_seed: seed,
            ..Default::default()
        }
    }
}
