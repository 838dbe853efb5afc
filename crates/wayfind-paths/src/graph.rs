//! Graph model searched by the generic engine.
//!
//! The engine only sees the [`Map`] trait: a start node, a target node, and
//! per-node positions and outgoing [`Edge`]s discovered lazily while the
//! search walks outward. [`NodeGraph`] is an arena-backed implementation
//! that callers can fill directly.

use std::fmt;
use std::hash::Hash;

use wayfind_core::Point;

use crate::SearchError;
use crate::marker::Cost;

/// A directed, weighted connection between two nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge<N> {
    start: N,
    end: N,
    cost: f64,
}

impl<N: Copy> Edge<N> {
    /// Create a new edge. The cost is validated when the edge is inserted
    /// into a [`NodeGraph`] or traversed by a search.
    #[inline]
    pub fn new(start: N, end: N, cost: f64) -> Self {
        Self { start, end, cost }
    }

    #[inline]
    pub fn start(&self) -> N {
        self.start
    }

    #[inline]
    pub fn end(&self) -> N {
        self.end
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

/// Query interface over a graph of positioned nodes.
pub trait Graph {
    /// Node identity. Used as the key of search-scoped bookkeeping.
    type Node: Copy + Eq + Hash + fmt::Debug;
    /// Opaque position handed to the heuristic.
    type Position;

    /// Position of `node`.
    fn position(&self, node: Self::Node) -> &Self::Position;

    /// Append the outgoing edges of `node` into `buf`. The caller clears
    /// `buf` before calling.
    fn edges(&self, node: Self::Node, buf: &mut Vec<Edge<Self::Node>>);
}

/// A graph together with the two endpoints of a search.
pub trait Map: Graph {
    fn start(&self) -> Self::Node;
    fn target(&self) -> Self::Node;
}

// ---------------------------------------------------------------------------
// NodeGraph
// ---------------------------------------------------------------------------

/// Index of a node inside a [`NodeGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Id of the node inserted `index`-th into its graph.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
struct NodeData<P> {
    position: P,
    edges: Vec<Edge<NodeId>>,
}

/// Arena-backed directed graph with positions of type `P`.
#[derive(Clone, Debug)]
pub struct NodeGraph<P> {
    nodes: Vec<NodeData<P>>,
}

impl<P> Default for NodeGraph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> NodeGraph<P> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create an empty graph with room for `n` nodes.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n),
        }
    }

    /// Add a node at `position` and return its id.
    pub fn add_node(&mut self, position: P) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            position,
            edges: Vec::new(),
        });
        id
    }

    /// Add a directed edge from `from` to `to`.
    ///
    /// Fails if either node is unknown or `cost` is negative or NaN.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, cost: f64) -> Result<(), SearchError> {
        if to.0 >= self.nodes.len() {
            return Err(SearchError::UnknownNode(to));
        }
        if !cost.is_valid() {
            return Err(SearchError::NegativeEdgeCost { cost });
        }
        let node = self
            .nodes
            .get_mut(from.0)
            .ok_or(SearchError::UnknownNode(from))?;
        node.edges.push(Edge::new(from, to, cost));
        Ok(())
    }

    /// Add edges in both directions between `a` and `b`.
    pub fn connect(&mut self, a: NodeId, b: NodeId, cost: f64) -> Result<(), SearchError> {
        self.add_edge(a, b, cost)?;
        self.add_edge(b, a, cost)
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of `id`, or `None` if it is not part of this graph.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&P> {
        self.nodes.get(id.0).map(|n| &n.position)
    }

    /// Outgoing edges of `id`.
    #[inline]
    pub fn edges_of(&self, id: NodeId) -> &[Edge<NodeId>] {
        self.nodes.get(id.0).map_or(&[], |n| n.edges.as_slice())
    }

    /// Iterator over all node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Borrow this graph as a [`Map`] from `start` to `target`.
    pub fn route(&self, start: NodeId, target: NodeId) -> Route<'_, Self> {
        Route::new(self, start, target)
    }
}

impl<P> Graph for NodeGraph<P> {
    type Node = NodeId;
    type Position = P;

    #[inline]
    fn position(&self, node: NodeId) -> &P {
        &self.nodes[node.0].position
    }

    #[inline]
    fn edges(&self, node: NodeId, buf: &mut Vec<Edge<NodeId>>) {
        buf.extend_from_slice(self.edges_of(node));
    }
}

/// A graph parsed from character rows by [`NodeGraph::from_char_grid`].
#[derive(Clone, Debug)]
pub struct CharGraph {
    pub graph: NodeGraph<Point>,
    /// Node of the `S` cell, if any.
    pub start: Option<NodeId>,
    /// Node of the `T` cell, if any.
    pub target: Option<NodeId>,
}

impl NodeGraph<Point> {
    /// Build a 4-connected unit-cost graph from character rows.
    ///
    /// Every character except `wall` becomes a node positioned at
    /// `(column, row)`. `S` and `T` mark the start and target cells.
    /// Rows may have different lengths.
    pub fn from_char_grid(rows: &[&str], wall: char) -> CharGraph {
        let mut graph = NodeGraph::new();
        let mut ids: Vec<Vec<Option<NodeId>>> = Vec::with_capacity(rows.len());
        let (mut start, mut target) = (None, None);

        for (y, row) in rows.iter().enumerate() {
            let mut line = Vec::new();
            for (x, ch) in row.chars().enumerate() {
                if ch == wall {
                    line.push(None);
                    continue;
                }
                let id = graph.add_node(Point::new(x as i32, y as i32));
                match ch {
                    'S' => start = Some(id),
                    'T' => target = Some(id),
                    _ => {}
                }
                line.push(Some(id));
            }
            ids.push(line);
        }

        let at = |p: Point| -> Option<NodeId> {
            if p.x < 0 || p.y < 0 {
                return None;
            }
            ids.get(p.y as usize)
                .and_then(|line| line.get(p.x as usize))
                .copied()
                .flatten()
        };

        for id in graph.node_ids().collect::<Vec<_>>() {
            let p = graph.nodes[id.0].position;
            for n in p.neighbors_4() {
                if let Some(nid) = at(n) {
                    graph.nodes[id.0].edges.push(Edge::new(id, nid, 1.0));
                }
            }
        }

        CharGraph {
            graph,
            start,
            target,
        }
    }
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// A borrowed graph plus search endpoints.
#[derive(Debug)]
pub struct Route<'g, G: Graph> {
    graph: &'g G,
    start: G::Node,
    target: G::Node,
}

impl<'g, G: Graph> Route<'g, G> {
    pub fn new(graph: &'g G, start: G::Node, target: G::Node) -> Self {
        Self {
            graph,
            start,
            target,
        }
    }

    #[inline]
    pub fn graph(&self) -> &'g G {
        self.graph
    }
}

impl<G: Graph> Clone for Route<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: Graph> Copy for Route<'_, G> {}

impl<G: Graph> Graph for Route<'_, G> {
    type Node = G::Node;
    type Position = G::Position;

    #[inline]
    fn position(&self, node: Self::Node) -> &Self::Position {
        self.graph.position(node)
    }

    #[inline]
    fn edges(&self, node: Self::Node, buf: &mut Vec<Edge<Self::Node>>) {
        self.graph.edges(node, buf);
    }
}

impl<G: Graph> Map for Route<'_, G> {
    #[inline]
    fn start(&self) -> Self::Node {
        self.start
    }

    #[inline]
    fn target(&self) -> Self::Node {
        self.target
    }
}
