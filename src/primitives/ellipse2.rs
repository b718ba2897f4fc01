//! 2D ellipse type.
//!
//! The skeleton fuzz tests bound vertex perturbations with ellipses built
//! from a vertex's neighbours, keeping the perturbed polygon close in shape
//! to the original.

use super::{Point2, Vec2};
use num_traits::Float;

/// An ellipse given by centre, semi-axes and the angle of the major axis.
///
/// ```
/// use straight_skeleton::primitives::{Ellipse2, Point2};
///
/// let circle: Ellipse2<f64> =
///     Ellipse2::from_foci(Point2::origin(), Point2::origin(), Point2::new(2.0, 0.0)).unwrap();
/// assert!(circle.contains(Point2::new(1.0, 1.0)));
/// assert!(!circle.contains(Point2::new(2.0, 1.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse2<F> {
    pub center: Point2<F>,
    /// Semi-axis along `rotation`.
    pub semi_major: F,
    pub semi_minor: F,
    /// Radians from +x to the major axis.
    pub rotation: F,
}

impl<F: Float> Ellipse2<F> {
    /// Creates an ellipse from centre, semi-axes and rotation.
    #[inline]
    pub fn new(center: Point2<F>, semi_major: F, semi_minor: F, rotation: F) -> Self {
        Self {
            center,
            semi_major,
            semi_minor,
            rotation,
        }
    }

    /// The ellipse with foci `f1` and `f2` whose boundary passes through
    /// `through`.
    ///
    /// Coincident foci give a circle. `None` when `through` lies between the
    /// foci and the ellipse collapses to a segment.
    pub fn from_foci(f1: Point2<F>, f2: Point2<F>, through: Point2<F>) -> Option<Self> {
        let half = F::one() / (F::one() + F::one());
        let a = (through.distance(f1) + through.distance(f2)) * half;
        let c = f1.distance(f2) * half;
        let b_sq = a * a - c * c;
        if b_sq <= F::epsilon() {
            return None;
        }
        let rotation = if c > F::epsilon() {
            (f2 - f1).angle()
        } else {
            F::zero()
        };
        Some(Self::new(f1.midpoint(f2), a, b_sq.sqrt(), rotation))
    }

    /// Unit vectors along the major and minor axes.
    #[inline]
    fn axes(&self) -> (Vec2<F>, Vec2<F>) {
        let major = Vec2::from_angle(self.rotation);
        (major, Vec2::new(-major.y, major.x))
    }

    /// Returns `true` for points inside or on the boundary.
    pub fn contains(&self, point: Point2<F>) -> bool {
        let (u, v) = self.axes();
        let d = point - self.center;
        let s = d.dot(u) / self.semi_major;
        let t = d.dot(v) / self.semi_minor;
        s * s + t * t <= F::one()
    }

    /// Boundary point at eccentric anomaly `t`. `t = 0` is the major vertex
    /// in the `rotation` direction.
    pub fn point_at(&self, t: F) -> Point2<F> {
        let (u, v) = self.axes();
        let (sin, cos) = t.sin_cos();
        self.center + u * (self.semi_major * cos) + v * (self.semi_minor * sin)
    }

    /// Both semi-axes multiplied by `factor`.
    #[inline]
    pub fn scaled(&self, factor: F) -> Self {
        Self {
            semi_major: self.semi_major * factor,
            semi_minor: self.semi_minor * factor,
            ..*self
        }
    }

    /// The same shape centred on `center`.
    #[inline]
    pub fn recentered(&self, center: Point2<F>) -> Self {
        Self { center, ..*self }
    }
}
