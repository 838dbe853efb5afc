use thiserror::Error;

use crate::graph::NodeId;

/// Errors reported by graph construction and the search engines.
///
/// An unreachable target is never an error: searches report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// An edge cost was negative or NaN.
    #[error("edge cost must be a non-negative number, got {cost}")]
    NegativeEdgeCost { cost: f64 },

    /// The heuristic produced a negative or NaN estimate.
    #[error("heuristic estimate must be a non-negative number, got {estimate}")]
    InvalidHeuristic { estimate: f64 },

    /// A grid configuration value was out of range.
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),

    /// An edge referenced a node that is not part of the graph.
    #[error("node {0} is not part of this graph")]
    UnknownNode(NodeId),

    /// A tile set spans more than `i32::MAX` tiles along one axis.
    #[error("tile layout of {width}x{height} exceeds the grid size limit")]
    LayoutTooLarge { width: i64, height: i64 },

    /// An accumulated path cost left the `i64` range.
    #[error("path cost exceeds the representable range")]
    CostOverflow,

    /// The expansion budget from [`SearchLimits`](crate::SearchLimits) ran out.
    #[error("search budget exhausted after expanding {expanded} nodes")]
    BudgetExhausted { expanded: usize },
}
