//! straight-skeleton - Event-driven straight skeletons of simple polygons
//!
//! Shrink every edge of a polygon inward at the same speed and the corners
//! trace out a tree of straight segments: the straight skeleton. This crate
//! computes it with a wavefront event simulation over `f64` coordinates,
//! using explicit tolerances throughout.
//!
//! # Example
//!
//! ```
//! use straight_skeleton::{straight_skeleton, Point2, Polygon};
//!
//! let rectangle = Polygon::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ]);
//!
//! let graph = straight_skeleton(&rectangle).unwrap();
//! assert_eq!(graph.interior_nodes().len(), 2);
//! assert!((graph.total_length() - (4.0 * 2.0_f64.sqrt() + 2.0)).abs() < 1e-9);
//! ```

pub mod bounds;
pub mod error;
pub mod polygon;
pub mod primitives;
pub mod skeleton;
pub mod tolerance;

pub use error::SkeletonError;
pub use polygon::{Polygon, Winding};
pub use primitives::{Point2, Ray2, Segment2, Vec2};
pub use skeleton::{solve, solve_with_config, straight_skeleton, Graph, SkeletonSolver, SolverConfig};
pub use tolerance::{fp_compare, intersect_rays, RayIntersection, RayIntersectionKind};
