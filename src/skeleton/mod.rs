//! Straight skeletons of simple polygons.
//!
//! Every edge of the polygon moves inward at unit speed; the skeleton is the
//! set of paths traced by the wavefront's vertices. The solver runs this as
//! an event simulation: each vertex carries a bisector, the nearest
//! collision between bisectors (or between a reflex bisector and a piece of
//! wavefront) is popped from a heap, and the bisectors involved end at a
//! shared node while new ones carry the wavefront on.
//!
//! Input is a clockwise ring (negative signed area). Exterior edge `i` runs
//! from vertex `i` to vertex `i + 1`; the interior lies on its right.
//!
//! # Example
//!
//! ```
//! use straight_skeleton::primitives::Point2;
//! use straight_skeleton::skeleton::solve;
//!
//! let square = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(0.0, 2.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(2.0, 0.0),
//! ];
//!
//! let graph = solve(&square).unwrap();
//! let centre = graph.interior_nodes()[0].position;
//! assert!((centre.x - 1.0).abs() < 1e-9);
//! assert!((centre.y - 1.0).abs() < 1e-9);
//! ```

mod accept;
mod collision;
mod config;
mod context;
mod graph;
mod split;
mod step;

#[cfg(test)]
mod tests;

pub use accept::{add_target_node_at_interior_edge_intersect, process_collision_node};
pub use collision::{
    apply_evaluation, bisector_ray, collide_interior_edges, collision_distance_from_basis_units,
    evaluate_edge_intersections, offset_rate, position_at_offset, reevaluate, source_offset_distance,
    Candidate, Collision, EdgeEvaluation,
};
pub use config::SolverConfig;
pub use context::{EdgeRank, Link, PendingEvent, SolverContext};
pub use graph::{Edge, Graph, InteriorEdge, Node};
pub use split::{find_split_event, SplitEvent};
pub use step::{
    gather_input_group, resolve_cluster, resolve_pair, resolve_triple, solve, solve_with_config,
    solve_with_trace, InputGroup, SkeletonSolver, StepOutcome,
};

use crate::error::SkeletonError;
use crate::polygon::Polygon;

/// Computes the straight skeleton of `polygon`, reversing its vertex order
/// first if it winds counter-clockwise.
pub fn straight_skeleton(polygon: &Polygon<f64>) -> Result<Graph, SkeletonError> {
    let mut ring = polygon.clone();
    ring.ensure_clockwise();
    solve(&ring.vertices)
}
