//! Ray/ray intersection classification.
//!
//! Downstream skeleton logic branches on *how* two rays relate, not on the
//! raw intersection distance, so every degenerate arrangement gets its own
//! [`RayIntersectionKind`].

use super::predicates::fp_compare;
use crate::primitives::Ray2;
use num_traits::Float;
use std::cmp::Ordering;

/// How two infinite rays relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RayIntersectionKind {
    /// Both rays start at the same point.
    IdenticalSource,
    /// Parallel directions on distinct lines.
    Parallel,
    /// Same line and direction; the first ray's source lies ahead.
    CoLinearFrom1,
    /// Same line and direction; the second ray's source lies ahead.
    CoLinearFrom2,
    /// Same line, opposite directions, sources facing each other.
    HeadOn,
    /// Distinct lines meeting ahead of both sources.
    Converging,
    /// The meeting point lies behind at least one source.
    Diverging,
}

/// Classification plus the forward distance along each ray to the meeting
/// point.
///
/// Distances are measured in units of each ray's direction vector, so they
/// are true distances when the directions are unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection<F> {
    /// The relationship between the rays.
    pub kind: RayIntersectionKind,
    /// Distance along the first ray.
    pub distance1: F,
    /// Distance along the second ray.
    pub distance2: F,
}

impl<F: Float> RayIntersection<F> {
    fn unreachable(kind: RayIntersectionKind) -> Self {
        Self {
            kind,
            distance1: F::infinity(),
            distance2: F::infinity(),
        }
    }

    /// Returns `true` if the rays meet at a finite point ahead of both
    /// sources.
    pub fn meets(&self) -> bool {
        matches!(
            self.kind,
            RayIntersectionKind::Converging
                | RayIntersectionKind::HeadOn
                | RayIntersectionKind::CoLinearFrom1
                | RayIntersectionKind::CoLinearFrom2
        )
    }
}

/// Classifies the relationship between two rays.
///
/// `eps` is used both as a distance tolerance (coincident sources, collinear
/// lines, meeting points marginally behind a source) and as the sine
/// tolerance for parallel directions, so the directions are expected to be
/// unit length.
///
/// Swapping the arguments swaps the distances and exchanges
/// [`CoLinearFrom1`](RayIntersectionKind::CoLinearFrom1) with
/// [`CoLinearFrom2`](RayIntersectionKind::CoLinearFrom2).
///
/// # Example
///
/// ```
/// use straight_skeleton::primitives::{Point2, Ray2, Vec2};
/// use straight_skeleton::tolerance::{intersect_rays, RayIntersectionKind};
///
/// let a = Ray2::new(Point2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
/// let b = Ray2::new(Point2::new(4.0, 0.0), Vec2::new(-1.0, 0.0));
/// let hit = intersect_rays(&a, &b, 1e-9);
/// assert_eq!(hit.kind, RayIntersectionKind::HeadOn);
/// assert_eq!(hit.distance1, 2.0);
/// ```
pub fn intersect_rays<F: Float>(ray1: &Ray2<F>, ray2: &Ray2<F>, eps: F) -> RayIntersection<F> {
    let delta = ray2.origin - ray1.origin;
    if delta.magnitude() <= eps {
        return RayIntersection::unreachable(RayIntersectionKind::IdenticalSource);
    }

    let d1 = ray1.direction;
    let d2 = ray2.direction;
    let cross = d1.cross(d2);

    if fp_compare(cross, F::zero(), eps) == Ordering::Equal {
        // Perpendicular gap between the two supporting lines.
        if delta.cross(d1).abs() > eps {
            return RayIntersection::unreachable(RayIntersectionKind::Parallel);
        }

        let gap = delta.dot(d1);
        if d1.dot(d2) < F::zero() {
            if gap > F::zero() {
                let half = gap / (F::one() + F::one());
                return RayIntersection {
                    kind: RayIntersectionKind::HeadOn,
                    distance1: half,
                    distance2: half,
                };
            }
            return RayIntersection::unreachable(RayIntersectionKind::Diverging);
        }

        return if gap > F::zero() {
            RayIntersection {
                kind: RayIntersectionKind::CoLinearFrom2,
                distance1: gap,
                distance2: F::zero(),
            }
        } else {
            RayIntersection {
                kind: RayIntersectionKind::CoLinearFrom1,
                distance1: F::zero(),
                distance2: -gap,
            }
        };
    }

    let t1 = delta.cross(d2) / cross;
    let t2 = delta.cross(d1) / cross;

    let kind = if t1 >= -eps && t2 >= -eps {
        RayIntersectionKind::Converging
    } else {
        RayIntersectionKind::Diverging
    };

    RayIntersection {
        kind,
        distance1: if kind == RayIntersectionKind::Converging {
            t1.max(F::zero())
        } else {
            t1
        },
        distance2: if kind == RayIntersectionKind::Converging {
            t2.max(F::zero())
        } else {
            t2
        },
    }
}
