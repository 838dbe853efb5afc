//! Shortest-path search over explicit graphs and implicit tile grids.
//!
//! - **Generic A\*** over any [`Map`] ([`astar`], [`dijkstra`]): nodes are
//!   discovered lazily by following edges from the start.
//! - **Grid A\*** over a dense passability array ([`GridAstar`]): neighbours
//!   are the adjacent passable tiles, with configurable straight and
//!   diagonal step costs and an octile default heuristic.
//! - **Tile adapter** ([`TileFinder`]): packs sparse, arbitrarily addressed
//!   tiles into a grid and searches it in the caller's coordinates.
//!
//! Every search keeps its bookkeeping in state owned by the call, so graphs
//! and engines can be shared between threads. "No path" is `Ok(None)`;
//! errors are reserved for invalid costs, estimates and configuration.
//!
//! # Frontier order
//!
//! Both engines expand the open node with the lowest f = g + h, breaking
//! ties by lower h and then by insertion order.

mod astar;
mod distance;
mod error;
mod frontier;
mod graph;
mod grid;
mod limits;
mod marker;
mod neighbors;
mod tiles;

pub use astar::{ResultPath, astar, astar_with_limits, dijkstra};
pub use distance::{chebyshev, euclidean, manhattan, octile};
pub use error::SearchError;
pub use graph::{CharGraph, Edge, Graph, Map, NodeGraph, NodeId, Route};
pub use grid::{
    DEFAULT_DIAGONAL_COST, DEFAULT_STRAIGHT_COST, GridAstar, GridConfig, GridPath, PassGrid,
};
pub use limits::SearchLimits;
pub use marker::Cost;
pub use neighbors::Neighbors;
pub use tiles::{Tile, TileFinder};
