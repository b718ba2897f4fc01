//! 2D vector type for directions, bases and offsets.

use num_traits::Float;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A displacement in the plane.
///
/// Skeleton edges store their direction of travel as a unit-length `Vec2`,
/// called the basis. Wavefront normals and bisector sums are `Vec2`s too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Creates a vector from its components.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// The zero vector, used as the basis of a zero-length side.
    #[inline]
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero())
    }

    /// Unit vector at `angle` radians, counter-clockwise from +x.
    #[inline]
    pub fn from_angle(angle: F) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    /// Polar angle in `(-π, π]`.
    #[inline]
    pub fn angle(self) -> F {
        self.y.atan2(self.x)
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, rhs: Self) -> F {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Perp-dot product. Positive when `rhs` turns counter-clockwise from
    /// `self`, zero when they are parallel.
    #[inline]
    pub fn cross(self, rhs: Self) -> F {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Squared length.
    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    /// Length, computed without intermediate overflow.
    #[inline]
    pub fn magnitude(self) -> F {
        self.x.hypot(self.y)
    }

    /// The unit vector along `self`, or `None` when the length is at most
    /// machine epsilon.
    #[inline]
    pub fn normalize(self) -> Option<Self> {
        let len = self.magnitude();
        (len > F::epsilon()).then(|| self / len)
    }

    /// Rotated a quarter turn clockwise.
    ///
    /// Applied to an edge direction of a clockwise polygon this gives the
    /// inward normal.
    #[inline]
    pub fn perpendicular_cw(self) -> Self {
        Self::new(self.y, -self.x)
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scale: F) -> Self {
        Self::new(self.x * scale, self.y * scale)
    }
}

impl<F: Float> Div<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn div(self, divisor: F) -> Self {
        Self::new(self.x / divisor, self.y / divisor)
    }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
