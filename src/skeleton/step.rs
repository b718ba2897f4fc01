//! The event loop.
//!
//! Each step pops the nearest live event, gathers every bisector and
//! wavefront segment that meets at its point and offset, resolves the group
//! and commits it. Groups dispatch on shape: two bisectors, three
//! bisectors, or anything larger or involving a split.

use super::accept::{add_target_node_at_interior_edge_intersect, process_collision_node};
use super::collision::{
    beyond_recorded_event, bisector_ray, position_at_offset, reevaluate, source_offset_distance,
};
use super::config::SolverConfig;
use super::context::{Link, PendingEvent, SolverContext};
use super::graph::Graph;
use super::split::endpoint_at_offset;
use crate::bounds::Aabb2;
use crate::error::SkeletonError;
use crate::polygon::{polygon_winding, Winding};
use crate::primitives::Point2;
use crate::tolerance::{intersect_rays, RayIntersectionKind};
use tracing::{debug, error, warn};

/// Everything that meets at one point at one offset.
#[derive(Debug, Clone, PartialEq)]
pub struct InputGroup {
    /// Offset distance of the event.
    pub offset: f64,
    /// Where it happens.
    pub point: Point2<f64>,
    /// Bisectors ending here, the popped one first.
    pub members: Vec<usize>,
    /// Wavefront segments cut here.
    pub splits: Vec<Link>,
}

impl InputGroup {
    /// Returns `true` if the group describes a real event: at least two
    /// bisectors meeting, or one striking a segment.
    pub fn is_valid(&self) -> bool {
        self.members.len() >= 2 || (!self.members.is_empty() && !self.splits.is_empty())
    }
}

/// What a single [`SkeletonSolver::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A group was committed at `node`.
    Resolved {
        /// Offset distance of the event.
        offset: f64,
        /// Node the group ended at.
        node: usize,
        /// Number of bisectors accepted.
        members: usize,
        /// Number of bisectors created.
        spawned: usize,
    },
    /// The event no longer matched the geometry and was re-scheduled.
    Skipped {
        /// Bisector whose event was dropped.
        edge: usize,
    },
    /// Every edge is accepted.
    Complete,
}

/// Step-by-step straight skeleton construction.
///
/// # Example
///
/// ```
/// use straight_skeleton::primitives::Point2;
/// use straight_skeleton::skeleton::{SkeletonSolver, SolverConfig, StepOutcome};
///
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 2.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(2.0, 0.0),
/// ];
///
/// let mut solver = SkeletonSolver::new(&square, &SolverConfig::default()).unwrap();
/// while solver.step().unwrap() != StepOutcome::Complete {}
/// assert_eq!(solver.graph().interior_nodes().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SkeletonSolver {
    ctx: SolverContext,
    steps: usize,
    step_limit: usize,
    complete: bool,
}

impl SkeletonSolver {
    /// Validates `points` and schedules the first events.
    pub fn new(points: &[Point2<f64>], config: &SolverConfig) -> Result<Self, SkeletonError> {
        let tolerance = validate_input(points, config)?;
        let mut ctx = SolverContext::new(points, tolerance, config.epsilon);
        let seeds = ctx.active_bisectors();
        reevaluate(&mut ctx, seeds);

        Ok(Self {
            ctx,
            steps: 0,
            step_limit: config.step_limit(points.len()),
            complete: false,
        })
    }

    /// The graph as it stands.
    pub fn graph(&self) -> &Graph {
        &self.ctx.graph
    }

    /// Full solver state, for diagnostics.
    pub fn context(&self) -> &SolverContext {
        &self.ctx
    }

    /// Number of events processed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns `true` once [`step`](Self::step) has reported completion.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Processes the nearest pending event.
    pub fn step(&mut self) -> Result<StepOutcome, SkeletonError> {
        if self.complete {
            return Ok(StepOutcome::Complete);
        }

        let Some(event) = self.ctx.pop_event() else {
            return self.finish();
        };

        if self.steps >= self.step_limit {
            error!(
                steps = self.steps,
                active = self.ctx.active_bisectors().len(),
                "step limit reached"
            );
            return Err(SkeletonError::ConvergenceFailed {
                iterations: self.steps,
            });
        }
        self.steps += 1;

        let Some(pending) = self.ctx.pending(event.edge).copied() else {
            return Ok(self.skip(event.edge));
        };

        let group = gather_input_group(&self.ctx, event.edge, &pending);
        if !group.is_valid() {
            return Ok(self.skip(event.edge));
        }

        let (node, spawned) = match (group.members.len(), group.splits.is_empty()) {
            (2, true) => resolve_pair(&mut self.ctx, &group)?,
            (3, true) => resolve_triple(&mut self.ctx, &group)?,
            _ => resolve_cluster(&mut self.ctx, &group)?,
        };

        debug!(
            offset = group.offset,
            node,
            size = group.members.len(),
            splits = group.splits.len(),
            spawned = spawned.len(),
            "resolved input group"
        );

        let mut seeds = Vec::new();
        for &id in &spawned {
            seeds.push(id);
            seeds.push(self.ctx.ring_prev(id));
            seeds.push(self.ctx.ring_next(id));
        }
        for &m in &group.members {
            seeds.extend(self.ctx.dependents_of(m));
        }
        for link in &group.splits {
            seeds.push(link.from);
            seeds.push(link.to);
        }
        // New segments can open or close split targets anywhere.
        seeds.extend(
            self.ctx
                .active_bisectors()
                .into_iter()
                .filter(|&id| self.ctx.is_reflex(id)),
        );
        reevaluate(&mut self.ctx, seeds);

        let released = self.ctx.accept_released_exterior_edges();
        if !released.is_empty() {
            debug!(?released, "accepted exterior edges");
        }

        Ok(StepOutcome::Resolved {
            offset: group.offset,
            node,
            members: group.members.len(),
            spawned: spawned.len(),
        })
    }

    /// Steps until complete and returns the finished graph.
    pub fn run(mut self) -> Result<Graph, SkeletonError> {
        while self.step()? != StepOutcome::Complete {}
        Ok(self.ctx.graph)
    }

    fn skip(&mut self, edge: usize) -> StepOutcome {
        warn!(edge, "dropping event that no longer matches the wavefront");
        self.ctx.set_pending(edge, None);
        let seeds = [edge, self.ctx.ring_prev(edge), self.ctx.ring_next(edge)];
        reevaluate(&mut self.ctx, seeds);
        StepOutcome::Skipped { edge }
    }

    fn finish(&mut self) -> Result<StepOutcome, SkeletonError> {
        let active = self.ctx.active_bisectors();
        let unaccepted = self.ctx.unaccepted_exterior();
        if active.is_empty() && unaccepted == 0 {
            self.complete = true;
            return Ok(StepOutcome::Complete);
        }

        error!(?active, unaccepted, steps = self.steps, "event queue exhausted");
        Err(SkeletonError::HeapExhausted {
            unaccepted,
        })
    }
}

/// Checks the input contract and returns the absolute tolerance.
fn validate_input(points: &[Point2<f64>], config: &SolverConfig) -> Result<f64, SkeletonError> {
    if points.len() < 3 {
        return Err(SkeletonError::TooFewPoints {
            count: points.len(),
        });
    }
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(SkeletonError::DegenerateInput);
    }

    let bounds = Aabb2::from_points(points.iter().copied()).ok_or(SkeletonError::DegenerateInput)?;
    let tolerance = config.absolute_tolerance(bounds.extent());

    let n = points.len();
    if (0..n).any(|i| points[i].approx_eq(points[(i + 1) % n], tolerance)) {
        return Err(SkeletonError::DegenerateInput);
    }

    match polygon_winding(points, tolerance * bounds.extent().max(1.0)) {
        Winding::Clockwise => Ok(tolerance),
        Winding::CounterClockwise => Err(SkeletonError::WrongWinding),
        Winding::Degenerate => Err(SkeletonError::DegenerateInput),
    }
}

/// Collects the group meeting at the recorded event of `edge`.
///
/// The popped bisector and its recorded partners are taken as given; any
/// other active bisector sitting at the point at that offset joins too, as
/// does every live segment the point lies on.
pub fn gather_input_group(ctx: &SolverContext, edge: usize, pending: &PendingEvent) -> InputGroup {
    let offset = pending.offset;
    let point = pending.point;
    let mut members = vec![edge];

    for &partner in &ctx.graph.interior_edge(edge).intersecting_edges {
        if ctx.is_active(partner) && !members.contains(&partner) {
            members.push(partner);
        }
    }
    for id in ctx.active_bisectors() {
        if !members.contains(&id) && bisector_reaches(ctx, id, offset, point) {
            members.push(id);
        }
    }

    let mut splits = Vec::new();
    let recorded = pending.split.filter(|link| ctx.link_is_live(link));
    for link in recorded.into_iter().chain(ctx.active_links()) {
        if members.contains(&link.from) || members.contains(&link.to) || splits.contains(&link) {
            continue;
        }
        if Some(link) == recorded || segment_contains(ctx, &link, offset, point) {
            splits.push(link);
        }
    }

    InputGroup {
        offset,
        point,
        members,
        splits,
    }
}

/// Returns `true` if bisector `id` is at `point` when the wavefront reaches
/// `offset`.
fn bisector_reaches(ctx: &SolverContext, id: usize, offset: f64, point: Point2<f64>) -> bool {
    let tol = ctx.tolerance();
    let t0 = source_offset_distance(ctx, id);
    if offset < t0 - tol || beyond_recorded_event(ctx, id, offset, point) {
        return false;
    }
    match position_at_offset(ctx, id, offset) {
        Some(p) => p.approx_eq(point, tol),
        None => {
            // Instant bisectors cover their whole length at birth.
            if (offset - t0).abs() > tol {
                return false;
            }
            let ray = bisector_ray(ctx, id);
            let (closest, along) = ray.closest_point(point);
            closest.distance(point) <= tol && along <= ctx.graph.interior_edge(id).length + tol
        }
    }
}

/// Returns `true` if `point` lies on segment `link` as it stands at `offset`.
fn segment_contains(ctx: &SolverContext, link: &Link, offset: f64, point: Point2<f64>) -> bool {
    let tol = ctx.tolerance();
    if (ctx.signed_distance(link.edge, point) - offset).abs() > tol {
        return false;
    }
    if offset < source_offset_distance(ctx, link.from) - tol
        || offset < source_offset_distance(ctx, link.to) - tol
    {
        return false;
    }
    let start = endpoint_at_offset(ctx, link.from, link.edge, offset);
    let end = endpoint_at_offset(ctx, link.to, link.edge, offset);
    let direction = ctx.graph.edge(link.edge).basis;
    let extent = (end - start).dot(direction);
    let along = (point - start).dot(direction);
    extent >= -tol && along >= -tol && along <= extent + tol
}

/// Commits a head-on join or a single two-way collision.
pub fn resolve_pair(
    ctx: &mut SolverContext,
    group: &InputGroup,
) -> Result<(usize, Vec<usize>), SkeletonError> {
    let &[a, b] = group.members.as_slice() else {
        return Err(SkeletonError::InvalidGroupSize {
            size: group.members.len(),
        });
    };

    let tol = ctx.tolerance();
    let hit = intersect_rays(&bisector_ray(ctx, a), &bisector_ray(ctx, b), tol);
    let meets = hit.meets() || hit.kind == RayIntersectionKind::IdenticalSource;
    let sourced = ctx.graph.source_position(a).approx_eq(group.point, tol)
        || ctx.graph.source_position(b).approx_eq(group.point, tol);
    // Nearly parallel rays can still arrive together.
    let arrive = passes_point(ctx, a, group) && passes_point(ctx, b, group);
    if !meets && !sourced && !arrive {
        let context = describe(ctx, group, &format!("pair classified {:?}", hit.kind));
        error!("{context}");
        return Err(SkeletonError::GeometricInconsistency { context });
    }

    commit(ctx, group)
}

/// Commits three bisectors meeting at one point.
pub fn resolve_triple(
    ctx: &mut SolverContext,
    group: &InputGroup,
) -> Result<(usize, Vec<usize>), SkeletonError> {
    if group.members.len() != 3 {
        return Err(SkeletonError::InvalidGroupSize {
            size: group.members.len(),
        });
    }
    check_members_pass_point(ctx, group)?;
    commit(ctx, group)
}

/// Commits a larger simultaneous collision, or any group that splits a
/// segment.
pub fn resolve_cluster(
    ctx: &mut SolverContext,
    group: &InputGroup,
) -> Result<(usize, Vec<usize>), SkeletonError> {
    if !group.is_valid() {
        return Err(SkeletonError::InvalidGroupSize {
            size: group.members.len(),
        });
    }
    check_members_pass_point(ctx, group)?;
    commit(ctx, group)
}

/// Returns `true` if bisector `id` runs through the group's point, or is
/// there when the wavefront reaches the group's offset.
fn passes_point(ctx: &SolverContext, id: usize, group: &InputGroup) -> bool {
    bisector_ray(ctx, id).distance_to_point(group.point) <= ctx.tolerance()
        || bisector_reaches(ctx, id, group.offset, group.point)
}

fn check_members_pass_point(ctx: &SolverContext, group: &InputGroup) -> Result<(), SkeletonError> {
    for &id in &group.members {
        if !passes_point(ctx, id, group) {
            let miss = bisector_ray(ctx, id).distance_to_point(group.point);
            let context = describe(ctx, group, &format!("edge {id} misses the point by {miss:e}"));
            error!("{context}");
            return Err(SkeletonError::GeometricInconsistency { context });
        }
    }
    Ok(())
}

fn commit(ctx: &mut SolverContext, group: &InputGroup) -> Result<(usize, Vec<usize>), SkeletonError> {
    let node = add_target_node_at_interior_edge_intersect(ctx, &group.members, group.point)?;
    let spawned = process_collision_node(ctx, node, group)?;
    Ok((node, spawned))
}

fn describe(ctx: &SolverContext, group: &InputGroup, what: &str) -> String {
    let members: Vec<String> = group
        .members
        .iter()
        .map(|&id| {
            format!(
                "{id} (source {:?}, parents {}/{})",
                ctx.graph.source_position(id),
                ctx.widdershins_parent(id),
                ctx.clockwise_parent(id)
            )
        })
        .collect();
    format!(
        "{what} at {:?}, offset {}: members [{}]",
        group.point,
        group.offset,
        members.join(", ")
    )
}

/// Computes the straight skeleton with the default configuration.
///
/// # Example
///
/// ```
/// use straight_skeleton::primitives::Point2;
/// use straight_skeleton::skeleton::solve;
///
/// let rectangle = [
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 2.0),
///     Point2::new(4.0, 2.0),
///     Point2::new(4.0, 0.0),
/// ];
///
/// let graph = solve(&rectangle).unwrap();
/// assert_eq!(graph.interior_nodes().len(), 2);
/// ```
pub fn solve(points: &[Point2<f64>]) -> Result<Graph, SkeletonError> {
    solve_with_config(points, &SolverConfig::default())
}

/// Computes the straight skeleton with an explicit configuration.
pub fn solve_with_config(points: &[Point2<f64>], config: &SolverConfig) -> Result<Graph, SkeletonError> {
    SkeletonSolver::new(points, config)?.run()
}

/// Computes the straight skeleton and returns a snapshot of the graph after
/// every resolved event, ending with the finished graph.
pub fn solve_with_trace(points: &[Point2<f64>], config: &SolverConfig) -> Result<Vec<Graph>, SkeletonError> {
    let mut solver = SkeletonSolver::new(points, config)?;
    let mut trace = vec![solver.graph().clone()];
    loop {
        match solver.step()? {
            StepOutcome::Resolved { .. } => trace.push(solver.graph().clone()),
            StepOutcome::Skipped { .. } => {}
            StepOutcome::Complete => break,
        }
    }
    Ok(trace)
}
