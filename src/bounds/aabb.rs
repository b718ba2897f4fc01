//! Axis-aligned bounding box.

use crate::primitives::Point2;
use num_traits::Float;

/// The smallest axis-aligned rectangle around a point set.
///
/// The solver scales its tolerance by the input box's [`extent`](Self::extent),
/// and every interior node of a finished skeleton lies inside the box grown
/// by that tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2<F> {
    /// Smallest x and y.
    pub min: Point2<F>,
    /// Largest x and y.
    pub max: Point2<F>,
}

impl<F: Float> Aabb2<F> {
    /// The degenerate box around one point.
    #[inline]
    pub fn from_point(p: Point2<F>) -> Self {
        Self { min: p, max: p }
    }

    /// The box around `points`, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2<F>>,
    {
        let mut iter = points.into_iter();
        let first = Self::from_point(iter.next()?);
        Some(iter.fold(first, |aabb, p| Self {
            min: Point2::new(aabb.min.x.min(p.x), aabb.min.y.min(p.y)),
            max: Point2::new(aabb.max.x.max(p.x), aabb.max.y.max(p.y)),
        }))
    }

    /// The longer side.
    #[inline]
    pub fn extent(self) -> F {
        (self.max.x - self.min.x).max(self.max.y - self.min.y)
    }

    /// The box grown by `margin` on every side.
    #[inline]
    pub fn inflated(self, margin: F) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[inline]
    pub fn contains_point(self, p: Point2<F>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
