//! Polygon input helpers.
//!
//! Signed area and winding classification for the simple
//! polygons fed to the skeleton solver.
//!
//! # Example
//!
//! ```
//! use straight_skeleton::polygon::{Polygon, Winding};
//! use straight_skeleton::primitives::Point2;
//!
//! let square = Polygon::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(0.0, 2.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(2.0, 0.0),
//! ]);
//!
//! assert_eq!(square.winding(1e-9), Winding::Clockwise);
//! assert_eq!(square.area(), 4.0);
//! ```

mod core;

pub use core::{polygon_signed_area, polygon_winding, Polygon, Winding};
