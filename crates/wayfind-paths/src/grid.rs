//! A* on a dense passability grid.
//!
//! The graph is implicit: a tile's neighbours are the adjacent passable
//! tiles (4 or 8 of them depending on [`GridConfig::diagonal`]) and the step
//! cost depends only on whether the move is axis-aligned or diagonal.

use log::{debug, trace, warn};
use wayfind_core::{Point, Range};

use crate::SearchError;
use crate::distance;
use crate::frontier::Frontier;
use crate::limits::SearchLimits;
use crate::marker::{Cost, MarkerStore};
use crate::neighbors::Neighbors;

/// Default cost of an axis-aligned step.
pub const DEFAULT_STRAIGHT_COST: i32 = 10;
/// Default cost of a diagonal step.
pub const DEFAULT_DIAGONAL_COST: i32 = 14;

// ---------------------------------------------------------------------------
// PassGrid
// ---------------------------------------------------------------------------

/// A zero-based `width × height` array of passable/blocked tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassGrid {
    rng: Range,
    cells: Vec<bool>,
}

impl PassGrid {
    /// Create a fully passable grid.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, true)
    }

    /// Create a grid where every tile has the given passability.
    pub fn filled(width: i32, height: i32, passable: bool) -> Self {
        let rng = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            rng,
            cells: vec![passable; rng.len()],
        }
    }

    /// Create a grid whose passability is given by `f` for each tile.
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(Point) -> bool) -> Self {
        let rng = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            rng,
            cells: rng.iter().map(&mut f).collect(),
        }
    }

    /// Parse character rows: `wall` is blocked, every other character is
    /// passable. Short rows are padded with blocked tiles.
    pub fn from_rows(rows: &[&str], wall: char) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::filled(width as i32, rows.len() as i32, false);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                grid.set_passable(Point::new(x as i32, y as i32), ch != wall);
            }
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.rng.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.rng.height()
    }

    /// The rectangle `[0, width) × [0, height)`.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.rng.contains(p)
    }

    /// Whether `p` is inside the grid and passable.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.rng.index(p).is_some_and(|i| self.cells[i])
    }

    /// Set the passability of `p`. Returns `false` if `p` is out of range.
    pub fn set_passable(&mut self, p: Point, passable: bool) -> bool {
        match self.rng.index(p) {
            Some(i) => {
                self.cells[i] = passable;
                true
            }
            None => false,
        }
    }

    /// Row-major iterator over `(tile, passable)`.
    pub fn iter(&self) -> impl Iterator<Item = (Point, bool)> + '_ {
        self.rng.iter().zip(self.cells.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Movement rules and costs for [`GridAstar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Allow the four diagonal moves.
    pub diagonal: bool,
    /// Cost of an axis-aligned step.
    pub straight_cost: i32,
    /// Cost of a diagonal step.
    pub diagonal_cost: i32,
    /// Allow a diagonal step past a blocked orthogonal neighbour.
    pub cut_corners: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            diagonal: true,
            straight_cost: DEFAULT_STRAIGHT_COST,
            diagonal_cost: DEFAULT_DIAGONAL_COST,
            cut_corners: true,
        }
    }
}

impl GridConfig {
    pub fn with_diagonal(mut self, diagonal: bool) -> Self {
        self.diagonal = diagonal;
        self
    }

    pub fn with_costs(mut self, straight: i32, diagonal: i32) -> Self {
        self.straight_cost = straight;
        self.diagonal_cost = diagonal;
        self
    }

    pub fn with_corner_cutting(mut self, cut_corners: bool) -> Self {
        self.cut_corners = cut_corners;
        self
    }

    /// Reject non-positive step costs.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.straight_cost <= 0 {
            return Err(SearchError::InvalidConfig(format!(
                "straight cost must be positive, got {}",
                self.straight_cost
            )));
        }
        if self.diagonal && self.diagonal_cost <= 0 {
            return Err(SearchError::InvalidConfig(format!(
                "diagonal cost must be positive, got {}",
                self.diagonal_cost
            )));
        }
        Ok(())
    }

    /// Cost of stepping from `from` to the adjacent tile `to`.
    #[inline]
    pub fn move_cost(&self, from: Point, to: Point) -> i64 {
        let d = (to - from).abs();
        if d.x + d.y == 1 {
            i64::from(self.straight_cost)
        } else {
            i64::from(self.diagonal_cost)
        }
    }

    /// Default heuristic: octile distance under these costs, or Manhattan
    /// distance scaled by the straight cost when diagonals are disabled.
    #[inline]
    pub fn estimate(&self, from: Point, to: Point) -> i64 {
        if self.diagonal {
            distance::octile(from, to, self.straight_cost, self.diagonal_cost)
        } else {
            distance::manhattan(from, to).saturating_mul(i64::from(self.straight_cost))
        }
    }
}

// ---------------------------------------------------------------------------
// GridPath
// ---------------------------------------------------------------------------

/// A path of adjacent tiles from start to target (both inclusive).
///
/// Costs are accumulated in `i64`; step costs are `i32`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGridPath"))]
pub struct GridPath {
    tiles: Vec<Point>,
    cost: i64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGridPath {
    tiles: Vec<Point>,
    cost: i64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGridPath> for GridPath {
    type Error = &'static str;

    fn try_from(raw: RawGridPath) -> Result<Self, Self::Error> {
        if raw.tiles.is_empty() {
            return Err("path must contain at least one tile");
        }
        if raw.cost < 0 {
            return Err("path cost must be non-negative");
        }
        Ok(Self {
            tiles: raw.tiles,
            cost: raw.cost,
        })
    }
}

impl GridPath {
    #[inline]
    pub fn start(&self) -> Point {
        self.tiles[0]
    }

    #[inline]
    pub fn target(&self) -> Point {
        self.tiles[self.tiles.len() - 1]
    }

    #[inline]
    pub fn tiles(&self) -> &[Point] {
        &self.tiles
    }

    /// Total movement cost.
    #[inline]
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Number of moves (`tiles().len() - 1`).
    #[inline]
    pub fn steps(&self) -> usize {
        self.tiles.len() - 1
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.tiles.iter()
    }

    pub fn into_tiles(self) -> Vec<Point> {
        self.tiles
    }

    /// Shift every tile by `offset`.
    pub(crate) fn translate(mut self, offset: Point) -> Self {
        for p in &mut self.tiles {
            *p = *p + offset;
        }
        self
    }
}

impl<'a> IntoIterator for &'a GridPath {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

// ---------------------------------------------------------------------------
// GridAstar
// ---------------------------------------------------------------------------

/// A* engine over a [`PassGrid`].
///
/// The engine holds only configuration; every call allocates its own
/// search state, so a single engine can serve concurrent searches.
#[derive(Clone, Debug)]
pub struct GridAstar {
    config: GridConfig,
    limits: SearchLimits,
}

impl GridAstar {
    /// Create an engine after validating `config`.
    pub fn new(config: GridConfig) -> Result<Self, SearchError> {
        config.validate()?;
        if config.diagonal && config.diagonal_cost < config.straight_cost {
            warn!(
                "grid: diagonal cost {} below straight cost {}; the octile estimate may overestimate",
                config.diagonal_cost, config.straight_cost
            );
        }
        Ok(Self {
            config,
            limits: SearchLimits::UNLIMITED,
        })
    }

    /// Apply an expansion budget to every search.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Shortest path from `start` to `target` using the default heuristic.
    ///
    /// Returns `Ok(None)` if either endpoint is outside the grid or blocked,
    /// or if the target is unreachable. A start equal to the target yields a
    /// single-tile path of cost 0.
    pub fn find_path(
        &self,
        grid: &PassGrid,
        start: Point,
        target: Point,
    ) -> Result<Option<GridPath>, SearchError> {
        self.find_path_with(grid, start, target, |a, b| self.config.estimate(a, b))
    }

    /// Like [`find_path`](Self::find_path) with a caller-supplied heuristic.
    pub fn find_path_with<H>(
        &self,
        grid: &PassGrid,
        start: Point,
        target: Point,
        heuristic: H,
    ) -> Result<Option<GridPath>, SearchError>
    where
        H: Fn(Point, Point) -> i64,
    {
        if !grid.is_passable(start) || !grid.is_passable(target) {
            debug!("grid: endpoint {start} or {target} is blocked or outside the grid");
            return Ok(None);
        }

        let estimate = |p: Point| -> Result<i64, SearchError> {
            let h = heuristic(p, target);
            if h.is_valid() {
                Ok(h)
            } else {
                Err(SearchError::InvalidHeuristic {
                    estimate: h.as_f64(),
                })
            }
        };

        let mut markers: MarkerStore<Point, i64> = MarkerStore::new();
        let mut frontier = Frontier::new();
        let mut nb = Neighbors::new();

        let h0 = estimate(start)?;
        markers.open_start(start, h0);
        frontier.push(start, 0, h0);

        let mut expanded = 0usize;

        while let Some(entry) = frontier.pop() {
            let current = entry.key;
            if !markers.take_open(current) {
                continue;
            }

            if current == target {
                let path = GridPath {
                    tiles: markers.path_to(target),
                    cost: markers.g(target),
                };
                debug!(
                    "grid: {start} -> {target} cost {} in {} steps ({expanded} expanded)",
                    path.cost,
                    path.steps()
                );
                return Ok(Some(path));
            }

            self.limits.check(expanded)?;
            expanded += 1;

            let current_g = markers.g(current);
            trace!("grid: expand {current} g={current_g} f={}", entry.f);

            for &next in self.neighbors(&mut nb, grid, current) {
                if markers.is_closed(next) {
                    continue;
                }
                let candidate = current_g
                    .checked_add(self.config.move_cost(current, next))
                    .ok_or(SearchError::CostOverflow)?;
                if !markers.relax(next, current, candidate) {
                    continue;
                }
                let h = markers.heuristic(next, || estimate(next))?;
                frontier.push(next, candidate, h);
            }

            markers.close(current);
        }

        debug!("grid: {target} unreachable from {start} ({expanded} expanded)");
        Ok(None)
    }

    /// Passable tiles reachable from `p` in one move.
    fn neighbors<'n>(&self, nb: &'n mut Neighbors, grid: &PassGrid, p: Point) -> &'n [Point] {
        if !self.config.diagonal {
            return nb.cardinal(p, |n| grid.is_passable(n));
        }
        let cut = self.config.cut_corners;
        nb.all(p, |n| {
            grid.is_passable(n)
                && (cut
                    || n.x == p.x
                    || n.y == p.y
                    || (grid.is_passable(Point::new(n.x, p.y))
                        && grid.is_passable(Point::new(p.x, n.y))))
        })
    }
}
