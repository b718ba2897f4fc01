//! Split events: a reflex bisector striking a non-adjacent wavefront
//! segment.
//!
//! The segment is not the original polygon edge but the piece of its offset
//! line still alive between two ring-adjacent bisectors, and both of its ends
//! keep moving. A strike only counts if it lands between where those ends
//! are at the moment of impact.

use super::collision::{bisector_ray, offset_rate, position_at_offset, source_offset_distance};
use super::context::{Link, SolverContext};
use crate::primitives::Point2;

/// A reflex bisector's strike on a wavefront segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitEvent {
    /// Offset distance of the strike.
    pub offset: f64,
    /// Where the bisector meets the segment.
    pub point: Point2<f64>,
    /// The segment struck.
    pub link: Link,
}

/// Finds where reflex bisector `instigator` strikes the segment `link`.
///
/// Returns `None` when the bisector and the segment's front never close on
/// each other, or when the strike lands outside the segment as it stands at
/// that offset.
pub fn find_split_event(ctx: &SolverContext, instigator: usize, link: &Link) -> Option<SplitEvent> {
    let tol = ctx.tolerance();
    let rate = offset_rate(ctx, instigator);
    if rate == 0.0 {
        return None;
    }

    let t0 = source_offset_distance(ctx, instigator);
    let source = ctx.graph.source_position(instigator);
    let velocity = ctx.graph.edge(instigator).basis / rate;
    let normal = ctx.inward_normal(link.edge);

    // The front of `link.edge` sits at distance t from its line at offset t;
    // the bisector closes that gap at 1 - v·n per unit offset.
    let gap = ctx.signed_distance(link.edge, source) - t0;
    let closing = 1.0 - velocity.dot(normal);
    if gap <= tol || closing <= ctx.angular_tolerance() {
        return None;
    }

    let offset = t0 + gap / closing;
    let point = source + velocity * (offset - t0);

    if offset < source_offset_distance(ctx, link.from) - tol
        || offset < source_offset_distance(ctx, link.to) - tol
    {
        return None;
    }

    let start = endpoint_at_offset(ctx, link.from, link.edge, offset);
    let end = endpoint_at_offset(ctx, link.to, link.edge, offset);
    let direction = ctx.graph.edge(link.edge).basis;

    // Reversed means the segment has already shrunk to nothing.
    let extent = (end - start).dot(direction);
    if extent < -tol {
        return None;
    }
    let along = (point - start).dot(direction);
    if along < -tol || along > extent + tol {
        return None;
    }

    Some(SplitEvent {
        offset,
        point,
        link: *link,
    })
}

/// Where segment end `id` sits on the offset line of `edge` at `offset`.
///
/// An instantly sweeping bisector has no position of its own; its ray is cut
/// with the offset line instead, falling back to its source when the two
/// never cross ahead of it.
pub(crate) fn endpoint_at_offset(ctx: &SolverContext, id: usize, edge: usize, offset: f64) -> Point2<f64> {
    if let Some(p) = position_at_offset(ctx, id, offset) {
        return p;
    }

    let ray = bisector_ray(ctx, id);
    let line_point = ctx.graph.source_position(edge) + ctx.inward_normal(edge) * offset;
    match ray.intersect_line(line_point, ctx.graph.edge(edge).basis) {
        Some(t) if t >= -ctx.tolerance() => ray.point_at(t.max(0.0)),
        _ => ray.origin,
    }
}
