//! Polygon rings and their winding.

use crate::primitives::Point2;
use num_traits::Float;

/// Orientation of a closed ring, read from the sign of its shoelace area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Negative area. The skeleton solver's input order; on screen, with y
    /// growing downward, it runs clockwise.
    Clockwise,
    /// Positive area.
    CounterClockwise,
    /// Area within tolerance of zero.
    Degenerate,
}

/// A closed ring of vertices. The last vertex joins back to the first.
///
/// [`skeleton::solve`](crate::skeleton::solve) wants [`Winding::Clockwise`]
/// input. Call [`ensure_clockwise`](Polygon::ensure_clockwise) first when the
/// source order is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<F> {
    pub vertices: Vec<Point2<F>>,
}

impl<F: Float> Polygon<F> {
    #[inline]
    pub fn new(vertices: Vec<Point2<F>>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area. Negative for solver input.
    pub fn signed_area(&self) -> F {
        polygon_signed_area(&self.vertices)
    }

    pub fn area(&self) -> F {
        self.signed_area().abs()
    }

    /// See [`polygon_winding`].
    pub fn winding(&self, eps: F) -> Winding {
        polygon_winding(&self.vertices, eps)
    }

    /// Reverses counter-clockwise rings in place.
    pub fn ensure_clockwise(&mut self) {
        if self.signed_area() > F::zero() {
            self.vertices.reverse();
        }
    }
}

/// Shoelace area of the closed ring `vertices`.
///
/// Positive when the ring turns counter-clockwise in a y-up frame. Rings of
/// fewer than three vertices have zero area.
pub fn polygon_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }
    let next = vertices.iter().cycle().skip(1);
    let twice = vertices
        .iter()
        .zip(next)
        .fold(F::zero(), |acc, (a, b)| acc + (a.x * b.y - b.x * a.y));
    twice / (F::one() + F::one())
}

/// Winding of `vertices`. Areas in `[-eps, eps]` are [`Winding::Degenerate`].
pub fn polygon_winding<F: Float>(vertices: &[Point2<F>], eps: F) -> Winding {
    let area = polygon_signed_area(vertices);
    if area < -eps {
        Winding::Clockwise
    } else if area > eps {
        Winding::CounterClockwise
    } else {
        Winding::Degenerate
    }
}
