//! Search-scoped per-node bookkeeping.
//!
//! Markers live in a [`MarkerStore`] owned by a single search call and keyed
//! by node identity. Nothing is written back onto the searched graph, so two
//! searches over the same graph never observe each other's state.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Numeric cost used by the engines: `f64` for graphs, `i64` for grids.
pub trait Cost: Copy + PartialEq + fmt::Debug + fmt::Display {
    /// Additive identity; the g-cost of the start node.
    const ZERO: Self;

    /// Sum used for frontier priorities. Integer costs saturate instead of
    /// wrapping.
    fn plus(self, rhs: Self) -> Self;

    /// Total order used by the frontier. NaN never reaches the frontier.
    fn cmp_cost(&self, other: &Self) -> Ordering;

    /// Whether the value is a usable edge cost or estimate (non-negative,
    /// not NaN).
    fn is_valid(self) -> bool;

    /// Lossless-enough widening for error reports.
    fn as_f64(self) -> f64;
}

impl Cost for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn plus(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn cmp_cost(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    #[inline]
    fn is_valid(self) -> bool {
        self >= 0.0
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

impl Cost for i64 {
    const ZERO: Self = 0;

    #[inline]
    fn plus(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }

    #[inline]
    fn cmp_cost(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn is_valid(self) -> bool {
        self >= 0
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

/// Transient search state for one node.
#[derive(Clone, Debug)]
pub(crate) struct Marker<K, C> {
    /// Best known distance from the start.
    pub(crate) g: C,
    /// Cached heuristic; `None` until first computed, immutable afterwards.
    pub(crate) h: Option<C>,
    /// Finalized; never relaxed again.
    pub(crate) closed: bool,
    /// Has a live frontier entry.
    pub(crate) open: bool,
    pub(crate) parent: Option<K>,
}

/// Node identity → [`Marker`] table for a single search run.
pub(crate) struct MarkerStore<K, C> {
    markers: HashMap<K, Marker<K, C>>,
}

impl<K, C> MarkerStore<K, C>
where
    K: Copy + Eq + Hash,
    C: Cost,
{
    pub(crate) fn new() -> Self {
        Self {
            markers: HashMap::new(),
        }
    }

    /// Seed the start node: g = 0, heuristic cached, closed and queued.
    pub(crate) fn open_start(&mut self, node: K, h: C) {
        self.markers.insert(
            node,
            Marker {
                g: C::ZERO,
                h: Some(h),
                closed: true,
                open: true,
                parent: None,
            },
        );
    }

    #[inline]
    pub(crate) fn is_closed(&self, node: K) -> bool {
        self.markers.get(&node).is_some_and(|m| m.closed)
    }

    /// g-cost of a node that must already carry a marker.
    #[inline]
    pub(crate) fn g(&self, node: K) -> C {
        self.markers[&node].g
    }

    /// Claim the frontier entry for `node`. Returns `false` for stale entries
    /// whose node has already been taken off the frontier.
    pub(crate) fn take_open(&mut self, node: K) -> bool {
        let Some(m) = self.markers.get_mut(&node) else {
            return false;
        };
        if !m.open {
            return false;
        }
        m.open = false;
        true
    }

    /// Record `candidate` as the distance to `node` through `parent` if it
    /// improves on what is known. Returns whether the marker changed.
    pub(crate) fn relax(&mut self, node: K, parent: K, candidate: C) -> bool {
        match self.markers.get_mut(&node) {
            Some(m) => {
                if m.closed || m.g.cmp_cost(&candidate) != Ordering::Greater {
                    return false;
                }
                m.g = candidate;
                m.parent = Some(parent);
                m.open = true;
                true
            }
            None => {
                self.markers.insert(
                    node,
                    Marker {
                        g: candidate,
                        h: None,
                        closed: false,
                        open: true,
                        parent: Some(parent),
                    },
                );
                true
            }
        }
    }

    /// Cached heuristic of `node`, computing it with `estimate` on first use.
    pub(crate) fn heuristic<E>(
        &mut self,
        node: K,
        estimate: impl FnOnce() -> Result<C, E>,
    ) -> Result<C, E> {
        let m = self
            .markers
            .get_mut(&node)
            .expect("heuristic requested for a node without a marker");
        if let Some(h) = m.h {
            return Ok(h);
        }
        let h = estimate()?;
        m.h = Some(h);
        Ok(h)
    }

    #[inline]
    pub(crate) fn close(&mut self, node: K) {
        if let Some(m) = self.markers.get_mut(&node) {
            m.closed = true;
        }
    }

    /// Follow predecessor links from `target` back to the start and return
    /// the sequence in start → target order.
    pub(crate) fn path_to(&self, target: K) -> Vec<K> {
        let mut path = Vec::new();
        let mut cur = Some(target);
        while let Some(node) = cur {
            path.push(node);
            cur = self.markers[&node].parent;
        }
        path.reverse();
        path
    }

    /// Number of nodes touched so far.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.markers.len()
    }
}
