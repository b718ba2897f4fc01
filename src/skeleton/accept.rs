//! Committing a resolved collision into the graph.

use super::context::{Link, SolverContext};
use super::step::InputGroup;
use crate::error::SkeletonError;
use crate::primitives::Point2;
use std::collections::HashSet;
use std::f64::consts::TAU;
use tracing::{debug, error};

/// Terminates every member at a node placed at `point` and accepts it.
///
/// An interior node already within tolerance of `point` is reused, so
/// simultaneous collisions at one spot share a node.
pub fn add_target_node_at_interior_edge_intersect(
    ctx: &mut SolverContext,
    members: &[usize],
    point: Point2<f64>,
) -> Result<usize, SkeletonError> {
    if let Some(&done) = members.iter().find(|&&id| !ctx.is_active(id)) {
        let context = format!("edge {done} is not an active bisector and cannot end at {point:?}");
        error!(edge = done, "{context}");
        return Err(SkeletonError::GeometricInconsistency { context });
    }

    let node = ctx.graph.find_or_add_node(point, ctx.tolerance());
    let position = ctx.graph.node(node).position;
    for &id in members {
        let length = ctx.graph.source_position(id).distance(position);
        ctx.graph.interior_edge_mut(id).length = length;
        ctx.graph.set_target(id, node);
        ctx.accept_edge(id);
    }
    Ok(node)
}

/// A wavefront segment touching the collision node.
#[derive(Debug, Clone, Copy)]
struct Stub {
    /// Exterior edge the segment belongs to.
    edge: usize,
    /// Surviving bisector at the segment's far end.
    neighbour: usize,
    /// Direction pointing away from the node along the segment.
    angle: f64,
    /// Split segment the stub was cut from.
    link: Option<Link>,
}

/// Spawns the bisectors that carry the wavefront on from `node`.
///
/// Every surviving segment arriving at the node is paired with the first
/// segment leaving it clockwise; each pair becomes a bisector whose
/// widdershins parent is the arriving edge and whose clockwise parent is the
/// leaving edge, and the ring is rewired through it. Returns the new ids.
pub fn process_collision_node(
    ctx: &mut SolverContext,
    node: usize,
    group: &InputGroup,
) -> Result<Vec<usize>, SkeletonError> {
    let in_group: HashSet<usize> = group.members.iter().copied().collect();
    let mut incoming = Vec::new();
    let mut outgoing = Vec::new();

    for &m in &group.members {
        let prev = ctx.ring_prev(m);
        if !in_group.contains(&prev) {
            let edge = ctx.widdershins_parent(m);
            incoming.push(Stub {
                edge,
                neighbour: prev,
                angle: (-ctx.graph.edge(edge).basis).angle(),
                link: None,
            });
        }
        let next = ctx.ring_next(m);
        if !in_group.contains(&next) {
            let edge = ctx.clockwise_parent(m);
            outgoing.push(Stub {
                edge,
                neighbour: next,
                angle: ctx.graph.edge(edge).basis.angle(),
                link: None,
            });
        }
    }

    for link in &group.splits {
        let basis = ctx.graph.edge(link.edge).basis;
        incoming.push(Stub {
            edge: link.edge,
            neighbour: link.from,
            angle: (-basis).angle(),
            link: Some(*link),
        });
        outgoing.push(Stub {
            edge: link.edge,
            neighbour: link.to,
            angle: basis.angle(),
            link: Some(*link),
        });
    }

    if incoming.len() != outgoing.len() {
        let context = format!(
            "node {node} at {:?}: {} arriving segments but {} leaving (members {:?})",
            group.point,
            incoming.len(),
            outgoing.len(),
            group.members
        );
        error!(node, "{context}");
        return Err(SkeletonError::GeometricInconsistency { context });
    }

    let pairs = pair_stubs(ctx, &incoming, &outgoing);
    let mut seen = HashSet::new();
    let mut spawned = Vec::new();

    for (i, o) in pairs {
        let (arriving, leaving) = (incoming[i], outgoing[o]);
        if arriving.link.is_some() && arriving.link == leaving.link {
            // The segment was not actually cut; it stays as it is.
            continue;
        }
        if !seen.insert((arriving.edge, leaving.edge, arriving.neighbour, leaving.neighbour)) {
            continue;
        }
        let id = ctx.spawn_bisector(node, arriving.edge, leaving.edge, group.offset);
        ctx.link(arriving.neighbour, id);
        ctx.link(id, leaving.neighbour);
        spawned.push(id);
    }

    debug!(
        node,
        members = group.members.len(),
        splits = group.splits.len(),
        spawned = spawned.len(),
        "processed collision node"
    );
    Ok(spawned)
}

/// Matches arriving to leaving stubs by the clockwise sweep from the leaving
/// direction to the arriving one, smallest first.
///
/// A sweep within tolerance of a full turn counts as zero: the two segments
/// lie on top of each other, as in a collapsed corridor.
fn pair_stubs(ctx: &SolverContext, incoming: &[Stub], outgoing: &[Stub]) -> Vec<(usize, usize)> {
    let mut options = Vec::with_capacity(incoming.len() * outgoing.len());
    for (i, arriving) in incoming.iter().enumerate() {
        for (o, leaving) in outgoing.iter().enumerate() {
            let mut sweep = (leaving.angle - arriving.angle).rem_euclid(TAU);
            if TAU - sweep <= ctx.angular_tolerance() {
                sweep = 0.0;
            }
            let span = ctx.clockwise_span(arriving.edge, leaving.edge);
            options.push((sweep, span, i, o));
        }
    }
    options.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
            .then(a.3.cmp(&b.3))
    });

    let mut used_in = vec![false; incoming.len()];
    let mut used_out = vec![false; outgoing.len()];
    let mut pairs = Vec::with_capacity(incoming.len());
    for (_, _, i, o) in options {
        if used_in[i] || used_out[o] {
            continue;
        }
        used_in[i] = true;
        used_out[o] = true;
        pairs.push((i, o));
    }
    pairs
}
