//! Arena storage for the skeleton graph.
//!
//! Nodes and edges live in dense vectors indexed by id. The first `N` nodes
//! and edges are the input polygon; every interior edge `id >= N` has a
//! bookkeeping twin at `interior_edges[id - N]`, so
//! `edges.len() == num_exterior_nodes + interior_edges.len()` always holds.

use crate::primitives::{Point2, Segment2, Vec2};

/// A point of the skeleton graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Dense id, equal to the node's index.
    pub id: usize,
    /// Position in input coordinates.
    pub position: Point2<f64>,
    /// Edges whose target is this node.
    pub in_edges: Vec<usize>,
    /// Edges whose source is this node.
    pub out_edges: Vec<usize>,
}

/// A directed edge of the skeleton graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Dense id, equal to the edge's index.
    pub id: usize,
    /// Node the edge starts at.
    pub source: usize,
    /// Node the edge ends at, once known.
    pub target: Option<usize>,
    /// Unit direction of travel.
    pub basis: Vec2<f64>,
}

/// Bookkeeping for a bisector (an interior edge).
#[derive(Debug, Clone, PartialEq)]
pub struct InteriorEdge {
    /// Id of the matching [`Edge`].
    pub id: usize,
    /// Exterior edge on the bisector's clockwise side; the wavefront leaves
    /// the bisector along this edge.
    pub clockwise_parent: usize,
    /// Exterior edge on the bisector's widdershins side; the wavefront
    /// arrives at the bisector along this edge.
    pub widdershins_parent: usize,
    /// Distance along the basis to the nearest known collision. Final once
    /// the edge is accepted.
    pub length: f64,
    /// Edges tied for that collision: interior ids for bisector partners,
    /// the exterior id for a split target.
    pub intersecting_edges: Vec<usize>,
    /// Bumped on every re-evaluation; stale heap entries carry an older value.
    pub heap_generation: u64,
    /// Offset distance at which the bisector was born.
    pub source_offset: f64,
}

/// The straight skeleton graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    interior_edges: Vec<InteriorEdge>,
    num_exterior_nodes: usize,
}

impl Graph {
    /// Builds the exterior ring from clockwise input points.
    ///
    /// Creates one node per point and one edge per side; edge `i` runs from
    /// node `i` to node `i + 1 (mod N)`. Inputs are validated by the solver
    /// before they get here, so a zero-length side keeps a zero basis.
    pub fn init_bounding_polygon(points: &[Point2<f64>]) -> Self {
        let n = points.len();
        let mut graph = Self {
            nodes: Vec::with_capacity(2 * n),
            edges: Vec::with_capacity(3 * n),
            interior_edges: Vec::with_capacity(2 * n),
            num_exterior_nodes: n,
        };

        for &p in points {
            graph.add_node(p);
        }

        for i in 0..n {
            let j = (i + 1) % n;
            let basis = (points[j] - points[i]).normalize().unwrap_or(Vec2::zero());
            graph.edges.push(Edge {
                id: i,
                source: i,
                target: Some(j),
                basis,
            });
            graph.nodes[i].out_edges.push(i);
            graph.nodes[j].in_edges.push(i);
        }

        graph
    }

    /// Appends a node and returns its id.
    pub fn add_node(&mut self, position: Point2<f64>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            position,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        });
        id
    }

    /// Returns the interior node within `tolerance` of `position`, creating
    /// one if none exists.
    ///
    /// Exterior nodes are never matched: a collision on the boundary still
    /// gets its own interior node.
    pub fn find_or_add_node(&mut self, position: Point2<f64>, tolerance: f64) -> usize {
        let existing = self.nodes[self.num_exterior_nodes..]
            .iter()
            .find(|node| node.position.approx_eq(position, tolerance));

        match existing {
            Some(node) => node.id,
            None => self.add_node(position),
        }
    }

    /// Appends an interior edge starting at `source` together with its
    /// bookkeeping twin, and returns the new id.
    pub fn add_edge(
        &mut self,
        source: usize,
        basis: Vec2<f64>,
        widdershins_parent: usize,
        clockwise_parent: usize,
        source_offset: f64,
    ) -> usize {
        let id = self.edges.len();
        self.edges.push(Edge {
            id,
            source,
            target: None,
            basis,
        });
        self.interior_edges.push(InteriorEdge {
            id,
            clockwise_parent,
            widdershins_parent,
            length: f64::INFINITY,
            intersecting_edges: Vec::new(),
            heap_generation: 0,
            source_offset,
        });
        self.nodes[source].out_edges.push(id);
        id
    }

    /// Terminates `edge` at `node`.
    pub(crate) fn set_target(&mut self, edge: usize, node: usize) {
        self.edges[edge].target = Some(node);
        self.nodes[node].in_edges.push(edge);
    }

    /// All nodes, exterior first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, exterior first.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Bookkeeping records of every interior edge.
    pub fn interior_edges(&self) -> &[InteriorEdge] {
        &self.interior_edges
    }

    /// Number of input vertices (and exterior edges).
    pub fn num_exterior_nodes(&self) -> usize {
        self.num_exterior_nodes
    }

    /// Collision nodes created by the solver.
    pub fn interior_nodes(&self) -> &[Node] {
        &self.nodes[self.num_exterior_nodes..]
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    /// Returns the edge with the given id.
    pub fn edge(&self, id: usize) -> &Edge {
        &self.edges[id]
    }

    /// Returns `true` if `id` names an exterior edge.
    pub fn is_exterior(&self, id: usize) -> bool {
        id < self.num_exterior_nodes
    }

    /// Returns the bookkeeping record of interior edge `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is an exterior edge.
    pub fn interior_edge(&self, id: usize) -> &InteriorEdge {
        &self.interior_edges[id - self.num_exterior_nodes]
    }

    pub(crate) fn interior_edge_mut(&mut self, id: usize) -> &mut InteriorEdge {
        &mut self.interior_edges[id - self.num_exterior_nodes]
    }

    /// Position of the edge's source node.
    pub fn source_position(&self, id: usize) -> Point2<f64> {
        self.nodes[self.edges[id].source].position
    }

    /// Interior edges that have reached their target, as segments.
    pub fn to_segments(&self) -> Vec<Segment2<f64>> {
        self.edges[self.num_exterior_nodes..]
            .iter()
            .filter_map(|edge| {
                let target = edge.target?;
                Some(Segment2::new(
                    self.nodes[edge.source].position,
                    self.nodes[target].position,
                ))
            })
            .collect()
    }

    /// Summed length of all terminated interior edges.
    pub fn total_length(&self) -> f64 {
        self.to_segments().iter().map(|s| s.length()).sum()
    }
}
