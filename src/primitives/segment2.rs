//! 2D line segment type.

use super::Point2;
use num_traits::Float;

/// A straight piece of the plane between `start` and `end`.
///
/// [`Graph::to_segments`](crate::skeleton::Graph::to_segments) hands out
/// the finished skeleton's edges in this form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    /// Creates a segment from its two endpoints.
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    /// Distance from `start` to `end`.
    #[inline]
    pub fn length(self) -> F {
        self.start.distance(self.end)
    }
}
