//! A* over any [`Map`], with Dijkstra as the zero-heuristic special case.

use log::{debug, trace};

use crate::SearchError;
use crate::frontier::Frontier;
use crate::graph::{Graph, Map};
use crate::limits::SearchLimits;
use crate::marker::{Cost, MarkerStore};

/// A successful search result: the node sequence from start to target
/// (both inclusive) and its total cost.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPath<N>"))]
pub struct ResultPath<N> {
    nodes: Vec<N>,
    cost: f64,
}

/// Unchecked wire form of [`ResultPath`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPath<N> {
    nodes: Vec<N>,
    cost: f64,
}

#[cfg(feature = "serde")]
impl<N> TryFrom<RawPath<N>> for ResultPath<N> {
    type Error = &'static str;

    fn try_from(raw: RawPath<N>) -> Result<Self, Self::Error> {
        if raw.nodes.is_empty() {
            return Err("path must contain at least one node");
        }
        if !raw.cost.is_valid() {
            return Err("path cost must be a non-negative number");
        }
        Ok(Self {
            nodes: raw.nodes,
            cost: raw.cost,
        })
    }
}

impl<N: Copy> ResultPath<N> {
    /// First node of the path.
    #[inline]
    pub fn start(&self) -> N {
        self.nodes[0]
    }

    /// Last node of the path.
    #[inline]
    pub fn target(&self) -> N {
        self.nodes[self.nodes.len() - 1]
    }

    /// Every node from start to target.
    #[inline]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Sum of the edge costs along the path.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of edges followed (`nodes().len() - 1`).
    #[inline]
    pub fn steps(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Positions of the path's nodes in `graph`.
    pub fn positions<'g, G>(&self, graph: &'g G) -> impl Iterator<Item = &'g G::Position>
    where
        G: Graph<Node = N>,
    {
        self.nodes.iter().map(move |&n| graph.position(n))
    }

    pub fn into_nodes(self) -> Vec<N> {
        self.nodes
    }
}

/// Shortest path from `map.start()` to `map.target()`.
///
/// `heuristic(a, b)` estimates the remaining cost from position `a` to
/// position `b`; it must be non-negative, and must never overestimate for the
/// result to be optimal. Each node's estimate is computed at most once.
///
/// Returns `Ok(None)` when the target is unreachable. Negative or NaN edge
/// costs and estimates are rejected as they are encountered.
pub fn astar<M, H>(map: &M, heuristic: H) -> Result<Option<ResultPath<M::Node>>, SearchError>
where
    M: Map,
    H: Fn(&M::Position, &M::Position) -> f64,
{
    astar_with_limits(map, heuristic, SearchLimits::UNLIMITED)
}

/// Like [`astar`], failing with [`SearchError::BudgetExhausted`] once
/// `limits` is exceeded.
pub fn astar_with_limits<M, H>(
    map: &M,
    heuristic: H,
    limits: SearchLimits,
) -> Result<Option<ResultPath<M::Node>>, SearchError>
where
    M: Map,
    H: Fn(&M::Position, &M::Position) -> f64,
{
    let start = map.start();
    let target = map.target();
    let target_pos = map.position(target);
    let estimate = |node: M::Node| -> Result<f64, SearchError> {
        let h = heuristic(map.position(node), target_pos);
        if h.is_valid() {
            Ok(h)
        } else {
            Err(SearchError::InvalidHeuristic { estimate: h })
        }
    };

    debug!("astar: searching {start:?} -> {target:?}");

    let mut markers: MarkerStore<M::Node, f64> = MarkerStore::new();
    let mut frontier = Frontier::new();

    let h0 = estimate(start)?;
    markers.open_start(start, h0);
    frontier.push(start, 0.0, h0);

    let mut edges = Vec::new();
    let mut expanded = 0usize;

    while let Some(entry) = frontier.pop() {
        let current = entry.key;
        if !markers.take_open(current) {
            continue;
        }

        if current == target {
            let path = ResultPath {
                nodes: markers.path_to(target),
                cost: markers.g(target),
            };
            debug!(
                "astar: reached {target:?} with cost {} in {} steps ({expanded} expanded, {} touched)",
                path.cost,
                path.steps(),
                markers.len()
            );
            return Ok(Some(path));
        }

        limits.check(expanded)?;
        expanded += 1;

        let current_g = markers.g(current);
        trace!("astar: expand {current:?} g={current_g} f={}", entry.f);

        edges.clear();
        map.edges(current, &mut edges);

        for edge in &edges {
            let cost = edge.cost();
            if !cost.is_valid() {
                return Err(SearchError::NegativeEdgeCost { cost });
            }
            let next = edge.end();
            if markers.is_closed(next) {
                continue;
            }
            if !markers.relax(next, current, current_g + cost) {
                continue;
            }
            let h = markers.heuristic(next, || estimate(next))?;
            frontier.push(next, markers.g(next), h);
        }

        markers.close(current);
    }

    debug!("astar: {target:?} unreachable from {start:?} ({expanded} expanded)");
    Ok(None)
}

/// Uniform-cost search: A* with a constant-zero heuristic.
pub fn dijkstra<M: Map>(map: &M) -> Result<Option<ResultPath<M::Node>>, SearchError> {
    astar(map, |_, _| 0.0)
}
