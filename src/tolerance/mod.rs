//! Epsilon-aware geometric predicates and operations.
//!
//! All functions in this module take explicit tolerance parameters.
//! No hidden epsilons are used.

mod predicates;
mod rays;

pub use predicates::{fp_compare, orient2d, Orientation};
pub use rays::{intersect_rays, RayIntersection, RayIntersectionKind};
