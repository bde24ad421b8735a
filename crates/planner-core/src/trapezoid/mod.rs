//! Trapezoid cells and the set that owns them.

pub mod set;
pub mod types;

pub use set::{SplitIndices, SplitKey, TrapezoidSet};
pub use types::{Originators, SplitResult, Trapezoid};
