//! Bisector motion and collision scoring.
//!
//! A bisector between exterior edges `e` (widdershins) and `f` (clockwise)
//! moves with velocity `(n_e + n_f) / (1 + n_e·n_f)`, where `n` is an edge's
//! inward unit normal: exactly the velocity that keeps it on both edges'
//! offset lines. Its basis is that velocity normalized, so travelling one
//! unit along the basis gains `basis·n_f` offset. When `e` and `f` are
//! antiparallel the velocity is unbounded; such a bisector has rate zero and
//! sweeps its whole length at the instant it is born.

use super::context::{Link, PendingEvent, SolverContext};
use super::split::find_split_event;
use crate::primitives::{Point2, Ray2, Vec2};
use crate::tolerance::{fp_compare, intersect_rays, RayIntersectionKind};
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// Unit basis of the bisector between edges with directions `d_ww` and
/// `d_cw`.
///
/// Antiparallel parents yield `d_cw`: the collapsed corridor continues in
/// the direction the clockwise edge travels.
pub(crate) fn bisector_basis(d_ww: Vec2<f64>, d_cw: Vec2<f64>, angular_tolerance: f64) -> Vec2<f64> {
    let sum = d_ww.perpendicular_cw() + d_cw.perpendicular_cw();
    // |n_ww + n_cw| is roughly the angle away from antiparallel.
    if sum.magnitude() <= angular_tolerance {
        return d_cw;
    }

    // The normal sum is parallel to d_cw - d_ww. Near antiparallel the sum
    // cancels catastrophically, so take whichever is longer.
    let diff = d_cw - d_ww;
    let direction = if diff.magnitude() <= sum.magnitude() {
        sum
    } else if d_ww.cross(d_cw) > 0.0 {
        -diff
    } else {
        diff
    };
    direction.normalize().unwrap_or(d_cw)
}

/// Offset distance at the bisector's source.
pub fn source_offset_distance(ctx: &SolverContext, id: usize) -> f64 {
    ctx.graph.interior_edge(id).source_offset
}

/// Offset gained per unit travelled along the basis; zero for a bisector
/// that sweeps instantly.
pub fn offset_rate(ctx: &SolverContext, id: usize) -> f64 {
    let rate = ctx
        .graph
        .edge(id)
        .basis
        .dot(ctx.inward_normal(ctx.clockwise_parent(id)));
    if rate <= ctx.angular_tolerance() {
        0.0
    } else {
        rate
    }
}

/// Offset distance reached after travelling `distance` along the basis.
pub fn collision_distance_from_basis_units(ctx: &SolverContext, id: usize, distance: f64) -> f64 {
    source_offset_distance(ctx, id) + distance * offset_rate(ctx, id)
}

/// Position of bisector `id` when the wavefront reaches `offset`.
///
/// Offsets before the bisector's birth give its source. `None` for an
/// instantly sweeping bisector, which has no single position.
pub fn position_at_offset(ctx: &SolverContext, id: usize, offset: f64) -> Option<Point2<f64>> {
    let rate = offset_rate(ctx, id);
    if rate == 0.0 {
        return None;
    }
    let travel = ((offset - source_offset_distance(ctx, id)) / rate).max(0.0);
    Some(ctx.graph.source_position(id) + ctx.graph.edge(id).basis * travel)
}

/// The bisector as a ray from its source along its basis.
pub fn bisector_ray(ctx: &SolverContext, id: usize) -> Ray2<f64> {
    Ray2::new(ctx.graph.source_position(id), ctx.graph.edge(id).basis)
}

/// Meeting point of two bisectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// How the two rays relate.
    pub kind: RayIntersectionKind,
    /// Where they meet.
    pub point: Point2<f64>,
    /// Offset distance at which they meet.
    pub offset: f64,
}

/// Intersects the rays of bisectors `a` and `b`.
///
/// Converging rays meet at their crossing, head-on rays at the midpoint of
/// their sources, co-linear rays at the source of the one ahead, and rays
/// sharing a source at that source. The offset is the meeting point's
/// distance from the exterior edge the two share when they are ring
/// neighbours, and is derived from whichever bisector moves at a finite rate
/// otherwise. Parallel or diverging rays never meet.
pub fn collide_interior_edges(ctx: &SolverContext, a: usize, b: usize) -> Option<Collision> {
    let ray_a = bisector_ray(ctx, a);
    let ray_b = bisector_ray(ctx, b);
    let hit = intersect_rays(&ray_a, &ray_b, ctx.tolerance());

    let point = match hit.kind {
        RayIntersectionKind::Converging
        | RayIntersectionKind::HeadOn
        | RayIntersectionKind::CoLinearFrom1
        | RayIntersectionKind::CoLinearFrom2 => ray_a.point_at(hit.distance1),
        RayIntersectionKind::IdenticalSource => ray_a.origin,
        RayIntersectionKind::Parallel | RayIntersectionKind::Diverging => return None,
    };

    let t_a = source_offset_distance(ctx, a);
    let t_b = source_offset_distance(ctx, b);
    let offset = if hit.kind == RayIntersectionKind::IdenticalSource {
        t_a.max(t_b)
    } else if ctx.clockwise_parent(a) == ctx.widdershins_parent(b) {
        ctx.signed_distance(ctx.clockwise_parent(a), point)
    } else if ctx.clockwise_parent(b) == ctx.widdershins_parent(a) {
        ctx.signed_distance(ctx.clockwise_parent(b), point)
    } else if offset_rate(ctx, a) > 0.0 {
        collision_distance_from_basis_units(ctx, a, point.distance(ray_a.origin))
    } else if offset_rate(ctx, b) > 0.0 {
        collision_distance_from_basis_units(ctx, b, point.distance(ray_b.origin))
    } else {
        t_a.max(t_b)
    };

    Some(Collision {
        kind: hit.kind,
        point,
        offset,
    })
}

/// One possible collision of a bisector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Interior id of the partner bisector, or the exterior id of a split
    /// target.
    pub partner: usize,
    /// Offset distance of the collision.
    pub offset: f64,
    /// Where it happens.
    pub point: Point2<f64>,
    /// Segment struck, for split candidates.
    pub split: Option<Link>,
}

/// Result of scoring one bisector against everything it can hit.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEvaluation {
    /// The bisector evaluated.
    pub edge: usize,
    /// Every valid candidate, unsorted.
    pub candidates: Vec<Candidate>,
    /// Offset of the nearest candidate, or infinity.
    pub offset: f64,
    /// Distance along the basis to the nearest candidate, or infinity.
    pub distance: f64,
    /// Position of the nearest candidate.
    pub point: Option<Point2<f64>>,
    /// Partners tied for the nearest candidate.
    pub intersecting_edges: Vec<usize>,
    /// Segment struck, when a split is among the winners.
    pub split: Option<Link>,
}

impl EdgeEvaluation {
    /// Returns `true` if the bisector has somewhere to go.
    pub fn is_finite(&self) -> bool {
        self.point.is_some()
    }
}

/// Returns `true` if bisector `id` would reach `point` at `offset` only
/// after its recorded event.
///
/// Ties on offset are broken by distance along the basis, which is all that
/// separates events on an instantly sweeping bisector.
pub(crate) fn beyond_recorded_event(ctx: &SolverContext, id: usize, offset: f64, point: Point2<f64>) -> bool {
    let Some(recorded) = ctx.pending(id) else {
        return false;
    };
    let tol = ctx.tolerance();
    match fp_compare(offset, recorded.offset, tol) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => {
            let source = ctx.graph.source_position(id);
            let basis = ctx.graph.edge(id).basis;
            (point - source).dot(basis) > (recorded.point - source).dot(basis) + tol
        }
    }
}

/// Scores bisector `id` against its ring neighbours and, if it is reflex,
/// against every wavefront segment it could split.
///
/// A neighbour only counts when the collision happens no later than that
/// neighbour's own recorded event; past that point the neighbour is gone.
pub fn evaluate_edge_intersections(ctx: &SolverContext, id: usize) -> EdgeEvaluation {
    let tol = ctx.tolerance();
    let t0 = source_offset_distance(ctx, id);
    let mut candidates = Vec::new();

    // Ring order matters: the shared exterior edge is the clockwise parent
    // of whichever bisector comes first.
    let neighbours = [(ctx.ring_prev(id), true), (ctx.ring_next(id), false)];

    for (partner, is_prev) in neighbours {
        if partner == id || !ctx.is_active(partner) {
            continue;
        }
        if candidates.iter().any(|c: &Candidate| c.partner == partner) {
            continue;
        }
        let collision = if is_prev {
            collide_interior_edges(ctx, partner, id)
        } else {
            collide_interior_edges(ctx, id, partner)
        };
        let Some(collision) = collision else {
            continue;
        };
        if collision.offset < t0 - tol
            || collision.offset < source_offset_distance(ctx, partner) - tol
            || beyond_recorded_event(ctx, partner, collision.offset, collision.point)
        {
            continue;
        }
        candidates.push(Candidate {
            partner,
            offset: collision.offset.max(t0),
            point: collision.point,
            split: None,
        });
    }

    if ctx.is_reflex(id) {
        for link in ctx.active_links() {
            if link.from == id || link.to == id {
                continue;
            }
            if let Some(split) = find_split_event(ctx, id, &link) {
                candidates.push(Candidate {
                    partner: link.edge,
                    offset: split.offset,
                    point: split.point,
                    split: Some(link),
                });
            }
        }
    }

    let source = ctx.graph.source_position(id);
    let along = |c: &Candidate| (c.point - source).dot(ctx.graph.edge(id).basis);
    let winner = candidates.iter().min_by(|a, b| {
        match fp_compare(a.offset, b.offset, tol) {
            Ordering::Equal => along(a).total_cmp(&along(b)),
            other => other,
        }
    });

    let Some(winner) = winner.copied() else {
        return EdgeEvaluation {
            edge: id,
            candidates,
            offset: f64::INFINITY,
            distance: f64::INFINITY,
            point: None,
            intersecting_edges: Vec::new(),
            split: None,
        };
    };

    let mut intersecting_edges = Vec::new();
    let mut split = None;
    for c in &candidates {
        let tied = fp_compare(c.offset, winner.offset, tol) == Ordering::Equal
            && c.point.approx_eq(winner.point, tol);
        if !tied {
            continue;
        }
        if !intersecting_edges.contains(&c.partner) {
            intersecting_edges.push(c.partner);
        }
        if split.is_none() {
            split = c.split;
        }
    }

    let rate = offset_rate(ctx, id);
    let distance = if rate > 0.0 {
        ((winner.offset - t0) / rate).max(0.0)
    } else {
        winner.point.distance(source)
    };

    trace!(
        edge = id,
        offset = winner.offset,
        candidates = candidates.len(),
        "evaluated bisector"
    );

    EdgeEvaluation {
        edge: id,
        candidates,
        offset: winner.offset,
        distance,
        point: Some(winner.point),
        intersecting_edges,
        split,
    }
}

/// Stores an evaluation on its bisector.
///
/// Returns `true` if anything changed, in which case the bisector's
/// generation is bumped and a fresh event is scheduled.
pub fn apply_evaluation(ctx: &mut SolverContext, evaluation: &EdgeEvaluation) -> bool {
    let id = evaluation.edge;
    let tol = ctx.tolerance();
    let next = evaluation.point.map(|point| PendingEvent {
        offset: evaluation.offset,
        point,
        split: evaluation.split,
    });

    let changed = match (ctx.pending(id), next.as_ref()) {
        (None, None) => false,
        (Some(old), Some(new)) => {
            fp_compare(old.offset, new.offset, tol) != Ordering::Equal
                || !old.point.approx_eq(new.point, tol)
                || old.split != new.split
                || ctx.graph.interior_edge(id).intersecting_edges != evaluation.intersecting_edges
        }
        _ => true,
    };
    if !changed {
        return false;
    }

    let record = ctx.graph.interior_edge_mut(id);
    record.length = evaluation.distance;
    record.intersecting_edges = evaluation.intersecting_edges.clone();
    record.heap_generation += 1;
    ctx.set_pending(id, next);
    if next.is_some() {
        ctx.push_event(id, evaluation.offset);
    }
    true
}

/// Re-evaluates `seeds` breadth-first until nothing changes.
///
/// An edge whose evaluation changed dirties its ring neighbours and every
/// edge that listed it as an intersector. Each edge is evaluated at most
/// once per call. Returns the number of evaluations performed.
pub fn reevaluate<I>(ctx: &mut SolverContext, seeds: I) -> usize
where
    I: IntoIterator<Item = usize>,
{
    let mut queue: VecDeque<usize> = seeds.into_iter().collect();
    let mut visited = HashSet::new();
    let mut evaluated = 0;

    while let Some(id) = queue.pop_front() {
        if !ctx.is_active(id) || !visited.insert(id) {
            continue;
        }
        let evaluation = evaluate_edge_intersections(ctx, id);
        evaluated += 1;
        if apply_evaluation(ctx, &evaluation) {
            queue.push_back(ctx.ring_prev(id));
            queue.push_back(ctx.ring_next(id));
            queue.extend(ctx.dependents_of(id));
        }
    }

    evaluated
}
