use crate::SearchError;

/// Optional bounds on a single search run.
///
/// Searches run to completion inside one call; a budget is the only way to
/// cut a long search short.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// Maximum number of node expansions before giving up.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    /// No limits.
    pub const UNLIMITED: Self = Self {
        max_expansions: None,
    };

    /// Limit the search to `n` node expansions.
    pub const fn expansions(n: usize) -> Self {
        Self {
            max_expansions: Some(n),
        }
    }

    /// Fail once `expanded` has reached the budget.
    #[inline]
    pub(crate) fn check(&self, expanded: usize) -> Result<(), SearchError> {
        match self.max_expansions {
            Some(max) if expanded >= max => Err(SearchError::BudgetExhausted { expanded }),
            _ => Ok(()),
        }
    }
}
