//! Geometric predicates with explicit tolerance.

use crate::primitives::Point2;
use num_traits::Float;
use std::cmp::Ordering;

/// Compares two scalars, treating values within `eps` of each other as equal.
///
/// Every tie-break in the skeleton solver goes through this function so that
/// two computations of "the same" offset always land on the same side of a
/// comparison.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use straight_skeleton::tolerance::fp_compare;
///
/// assert_eq!(fp_compare(1.0, 1.0 + 1e-12, 1e-9), Ordering::Equal);
/// assert_eq!(fp_compare(1.0, 2.0, 1e-9), Ordering::Less);
/// ```
#[inline]
pub fn fp_compare<F: Float>(a: F, b: F, eps: F) -> Ordering {
    if a == b || (a - b).abs() <= eps {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Which side of the directed line `a -> b` a third point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left of the line.
    CounterClockwise,
    /// Right of the line.
    Clockwise,
    /// On the line, within tolerance.
    Collinear,
}

/// Classifies `c` against the directed line `a -> b`.
///
/// `eps` bounds the perp-dot product `(b - a) x (c - a)`, which is twice the
/// signed triangle area, so it scales with the square of the input size.
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let cross = (b - a).cross(c - a);
    if cross > eps {
        Orientation::CounterClockwise
    } else if cross < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}
