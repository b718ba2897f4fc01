//! 2D ray type.

use super::{Point2, Vec2};
use num_traits::Float;

/// A half-line from `origin` along `direction`.
///
/// Every bisector of the skeleton is traced as a ray from its source node
/// along its unit basis, so ray parameters read as distances travelled.
/// The direction is not required to be unit length.
///
/// # Example
///
/// ```
/// use straight_skeleton::primitives::{Ray2, Point2, Vec2};
///
/// let ray: Ray2<f64> = Ray2::new(Point2::origin(), Vec2::new(1.0, 0.0));
/// let t = ray.intersect_line(Point2::new(5.0, -1.0), Vec2::new(0.0, 1.0));
/// assert_eq!(t, Some(5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray2<F> {
    /// Where the ray starts.
    pub origin: Point2<F>,
    /// Direction of travel.
    pub direction: Vec2<F>,
}

impl<F: Float> Ray2<F> {
    /// Creates a ray.
    #[inline]
    pub fn new(origin: Point2<F>, direction: Vec2<F>) -> Self {
        Self { origin, direction }
    }

    /// The point `t` direction-lengths from the origin. Negative `t` lies
    /// behind the ray.
    #[inline]
    pub fn point_at(&self, t: F) -> Point2<F> {
        self.origin + self.direction * t
    }

    /// Nearest point of the ray to `point`, with its parameter.
    ///
    /// Points behind the origin project onto the origin (`t = 0`).
    pub fn closest_point(&self, point: Point2<F>) -> (Point2<F>, F) {
        let len_sq = self.direction.magnitude_squared();
        if len_sq < F::epsilon() {
            return (self.origin, F::zero());
        }
        let t = ((point - self.origin).dot(self.direction) / len_sq).max(F::zero());
        (self.point_at(t), t)
    }

    /// Distance from `point` to the nearest point of the ray.
    #[inline]
    pub fn distance_to_point(&self, point: Point2<F>) -> F {
        point.distance(self.closest_point(point).0)
    }

    /// Parameter at which the ray's supporting line crosses the line through
    /// `point` along `direction`.
    ///
    /// The parameter may be negative. `None` when the lines are parallel.
    pub fn intersect_line(&self, point: Point2<F>, direction: Vec2<F>) -> Option<F> {
        let cross = self.direction.cross(direction);
        if cross.abs() < F::epsilon() {
            return None;
        }
        Some((point - self.origin).cross(direction) / cross)
    }
}
