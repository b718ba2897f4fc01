//! Mutable solver state.
//!
//! [`SolverContext`] owns the graph plus everything the event loop needs on
//! the side: acceptance flags, the wavefront ring, the pending event of every
//! bisector and the event heap. Every solver operation takes it by `&mut`.

use super::collision::{bisector_basis, reevaluate};
use super::graph::Graph;
use crate::bounds::Aabb2;
use crate::primitives::{Point2, Vec2};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::trace;

const NO_EDGE: usize = usize::MAX;

/// Generation of a bisector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeRank {
    /// Starts at an input vertex.
    Primary,
    /// Starts at a node reached only by primary bisectors.
    Secondary,
    /// Everything spawned later.
    Higher,
}

/// A wavefront segment between two ring-adjacent bisectors.
///
/// The segment lies on the offset line of exterior edge `edge`
/// (`clockwise_parent(from) == widdershins_parent(to) == edge`) and runs from
/// `from`'s position to `to`'s in the edge's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    /// Bisector at the start of the segment.
    pub from: usize,
    /// Bisector at the end of the segment.
    pub to: usize,
    /// Exterior edge the segment belongs to.
    pub edge: usize,
}

/// The nearest known collision of one bisector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingEvent {
    /// Offset distance of the collision.
    pub offset: f64,
    /// Where it happens.
    pub point: Point2<f64>,
    /// Wavefront segment struck, for split events.
    pub split: Option<Link>,
}

/// Entry for the event heap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event {
    pub offset: f64,
    pub sequence: u64,
    pub edge: usize,
    /// Generation counter to handle stale entries
    pub generation: u64,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; earlier pushes win ties
        other
            .offset
            .total_cmp(&self.offset)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Central state of a skeleton run.
#[derive(Debug, Clone)]
pub struct SolverContext {
    /// The graph under construction.
    pub graph: Graph,
    /// Acceptance flag of every edge, indexed by id.
    pub accepted_edges: Vec<bool>,
    widdershins: Vec<usize>,
    clockwise: Vec<usize>,
    pending: Vec<Option<PendingEvent>>,
    heap: BinaryHeap<Event>,
    sequence: u64,
    /// Active bisectors naming each exterior edge as a parent.
    parent_refs: Vec<usize>,
    tolerance: f64,
    angular_tolerance: f64,
    bounds: Aabb2<f64>,
}

impl SolverContext {
    /// Builds the exterior ring and one primary bisector per vertex.
    ///
    /// `points` must already be validated: at least three distinct,
    /// clockwise points. No events are scheduled yet.
    pub fn new(points: &[Point2<f64>], tolerance: f64, angular_tolerance: f64) -> Self {
        let n = points.len();
        let bounds = Aabb2::from_points(points.iter().copied())
            .unwrap_or_else(|| Aabb2::from_point(Point2::origin()));

        let mut ctx = Self {
            graph: Graph::init_bounding_polygon(points),
            accepted_edges: vec![false; n],
            widdershins: vec![NO_EDGE; n],
            clockwise: vec![NO_EDGE; n],
            pending: vec![None; n],
            heap: BinaryHeap::new(),
            sequence: 0,
            parent_refs: vec![0; n],
            tolerance,
            angular_tolerance,
            bounds,
        };

        for i in 0..n {
            ctx.spawn_bisector(i, (i + n - 1) % n, i, 0.0);
        }
        for i in 0..n {
            ctx.link(n + i, n + (i + 1) % n);
        }

        ctx
    }

    /// Absolute distance tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Tolerance for direction comparisons.
    pub fn angular_tolerance(&self) -> f64 {
        self.angular_tolerance
    }

    /// Bounding box of the input polygon.
    pub fn bounds(&self) -> Aabb2<f64> {
        self.bounds
    }

    /// Creates a bisector between two exterior edges at `source` and returns
    /// its id. The caller links it into the ring.
    pub(crate) fn spawn_bisector(
        &mut self,
        source: usize,
        widdershins_parent: usize,
        clockwise_parent: usize,
        source_offset: f64,
    ) -> usize {
        let basis = bisector_basis(
            self.graph.edge(widdershins_parent).basis,
            self.graph.edge(clockwise_parent).basis,
            self.angular_tolerance,
        );
        let id = self.graph.add_edge(
            source,
            basis,
            widdershins_parent,
            clockwise_parent,
            source_offset,
        );
        self.accepted_edges.push(false);
        self.widdershins.push(NO_EDGE);
        self.clockwise.push(NO_EDGE);
        self.pending.push(None);
        self.parent_refs[widdershins_parent] += 1;
        self.parent_refs[clockwise_parent] += 1;
        id
    }

    /// Exterior edge on the clockwise side of bisector `id`.
    pub fn clockwise_parent(&self, id: usize) -> usize {
        self.graph.interior_edge(id).clockwise_parent
    }

    /// Exterior edge on the widdershins side of bisector `id`.
    pub fn widdershins_parent(&self, id: usize) -> usize {
        self.graph.interior_edge(id).widdershins_parent
    }

    /// Unit normal of exterior edge `edge` pointing into the polygon.
    pub fn inward_normal(&self, edge: usize) -> Vec2<f64> {
        self.graph.edge(edge).basis.perpendicular_cw()
    }

    /// Signed distance of `point` from the supporting line of exterior edge
    /// `edge`, positive inside.
    pub fn signed_distance(&self, edge: usize, point: Point2<f64>) -> f64 {
        (point - self.graph.source_position(edge)).dot(self.inward_normal(edge))
    }

    /// Classifies bisector `id` by the node it starts at.
    pub fn edge_rank(&self, id: usize) -> EdgeRank {
        let source = self.graph.edge(id).source;
        if source < self.graph.num_exterior_nodes() {
            return EdgeRank::Primary;
        }
        let all_primary = self.graph.node(source).in_edges.iter().all(|&e| {
            !self.graph.is_exterior(e)
                && self.graph.edge(e).source < self.graph.num_exterior_nodes()
        });
        if all_primary {
            EdgeRank::Secondary
        } else {
            EdgeRank::Higher
        }
    }

    /// Returns `true` if bisector `id` sits on a reflex corner of the
    /// wavefront, the only kind that can split a segment.
    pub fn is_reflex(&self, id: usize) -> bool {
        let d_ww = self.graph.edge(self.widdershins_parent(id)).basis;
        let d_cw = self.graph.edge(self.clockwise_parent(id)).basis;
        d_ww.cross(d_cw) > self.angular_tolerance
    }

    /// Number of exterior edges stepped clockwise from `from` to reach `to`.
    pub fn clockwise_span(&self, from: usize, to: usize) -> usize {
        let n = self.graph.num_exterior_nodes();
        (to + n - from) % n
    }

    /// Returns `true` for an interior edge that is not yet accepted.
    pub fn is_active(&self, id: usize) -> bool {
        id < self.accepted_edges.len() && !self.graph.is_exterior(id) && !self.accepted_edges[id]
    }

    /// Ids of every active bisector, in creation order.
    pub fn active_bisectors(&self) -> Vec<usize> {
        (self.graph.num_exterior_nodes()..self.accepted_edges.len())
            .filter(|&id| !self.accepted_edges[id])
            .collect()
    }

    /// Ring neighbour of `id` along its widdershins parent.
    pub fn ring_prev(&self, id: usize) -> usize {
        self.widdershins[id]
    }

    /// Ring neighbour of `id` along its clockwise parent.
    pub fn ring_next(&self, id: usize) -> usize {
        self.clockwise[id]
    }

    pub(crate) fn link(&mut self, from: usize, to: usize) {
        self.clockwise[from] = to;
        self.widdershins[to] = from;
    }

    /// Every live wavefront segment.
    pub fn active_links(&self) -> Vec<Link> {
        self.active_bisectors()
            .into_iter()
            .map(|from| Link {
                from,
                to: self.clockwise[from],
                edge: self.clockwise_parent(from),
            })
            .collect()
    }

    /// Returns `true` if `link` still joins two active ring neighbours.
    pub fn link_is_live(&self, link: &Link) -> bool {
        self.is_active(link.from) && self.is_active(link.to) && self.clockwise[link.from] == link.to
    }

    /// Recorded nearest event of bisector `id`.
    pub fn pending(&self, id: usize) -> Option<&PendingEvent> {
        self.pending.get(id).and_then(Option::as_ref)
    }

    pub(crate) fn set_pending(&mut self, id: usize, event: Option<PendingEvent>) {
        self.pending[id] = event;
    }

    /// Schedules `edge` at `offset` under its current generation.
    pub(crate) fn push_event(&mut self, edge: usize, offset: f64) {
        let generation = self.graph.interior_edge(edge).heap_generation;
        self.heap.push(Event {
            offset,
            sequence: self.sequence,
            edge,
            generation,
        });
        self.sequence += 1;
    }

    /// Pops the nearest event whose edge is still active and whose
    /// generation is current.
    pub(crate) fn pop_event(&mut self) -> Option<Event> {
        while let Some(event) = self.heap.pop() {
            if !self.is_active(event.edge)
                || self.graph.interior_edge(event.edge).heap_generation != event.generation
            {
                trace!(edge = event.edge, offset = event.offset, "discarding stale event");
                continue;
            }
            return Some(event);
        }
        None
    }

    /// Marks `id` as final. Accepting a bisector releases its parents.
    pub fn accept_edge(&mut self, id: usize) {
        if self.accepted_edges[id] {
            return;
        }
        self.accepted_edges[id] = true;
        if !self.graph.is_exterior(id) {
            let ww = self.widdershins_parent(id);
            let cw = self.clockwise_parent(id);
            self.parent_refs[ww] = self.parent_refs[ww].saturating_sub(1);
            self.parent_refs[cw] = self.parent_refs[cw].saturating_sub(1);
        }
    }

    /// Accepts `id`, then re-evaluates every active bisector that listed it
    /// as an intersector.
    pub fn accept_edge_and_propagate(&mut self, id: usize) {
        self.accept_edge(id);
        let dependents = self.dependents_of(id);
        reevaluate(self, dependents);
    }

    /// Active bisectors listing `id` among their intersecting edges.
    pub fn dependents_of(&self, id: usize) -> Vec<usize> {
        self.active_bisectors()
            .into_iter()
            .filter(|&other| self.graph.interior_edge(other).intersecting_edges.contains(&id))
            .collect()
    }

    /// Accepts every exterior edge no active bisector still references and
    /// returns their ids.
    pub fn accept_released_exterior_edges(&mut self) -> Vec<usize> {
        let released: Vec<usize> = (0..self.graph.num_exterior_nodes())
            .filter(|&e| !self.accepted_edges[e] && self.parent_refs[e] == 0)
            .collect();
        for &e in &released {
            self.accept_edge_and_propagate(e);
        }
        released
    }

    /// Number of exterior edges not yet accepted.
    pub fn unaccepted_exterior(&self) -> usize {
        self.accepted_edges[..self.graph.num_exterior_nodes()]
            .iter()
            .filter(|&&accepted| !accepted)
            .count()
    }

    /// Returns `true` once every edge has been accepted.
    pub fn is_complete(&self) -> bool {
        self.accepted_edges.iter().all(|&accepted| accepted)
    }
}
