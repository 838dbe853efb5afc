//! Bridge from sparse, externally addressed tiles to [`GridAstar`].
//!
//! Tiles may live anywhere on the integer plane. [`TileFinder::build`]
//! packs them into a zero-based [`PassGrid`] covering their bounding
//! rectangle; [`TileFinder::find`] translates endpoints in and paths out.
//! Offsets are applied in `i64`, so tiles at the ends of the `i32` range
//! work like any others.

use std::fmt;

use log::debug;
use wayfind_core::Point;

use crate::SearchError;
use crate::grid::{GridAstar, GridConfig, GridPath, PassGrid};
use crate::limits::SearchLimits;

/// A tile addressed by arbitrary integer coordinates.
pub trait Tile {
    fn position(&self) -> Point;
    fn is_blocked(&self) -> bool;
}

impl<T: Tile + ?Sized> Tile for &T {
    fn position(&self) -> Point {
        (**self).position()
    }

    fn is_blocked(&self) -> bool {
        (**self).is_blocked()
    }
}

/// Boxed heuristic over caller coordinates.
type Heuristic = Box<dyn Fn(Point, Point) -> i64 + Send + Sync>;

/// Dense layout produced by the last build.
#[derive(Clone, Debug)]
struct Layout {
    /// Caller coordinates of grid tile (0, 0).
    offset: Point,
    grid: PassGrid,
}

impl Layout {
    /// Grid position of caller point `p`, if it lies inside the grid.
    fn to_grid(&self, p: Point) -> Option<Point> {
        let x = i32::try_from(i64::from(p.x) - i64::from(self.offset.x)).ok()?;
        let y = i32::try_from(i64::from(p.y) - i64::from(self.offset.y)).ok()?;
        let local = Point::new(x, y);
        self.grid.contains(local).then_some(local)
    }

    /// Caller position of grid tile `p`. In range for every tile of the grid.
    fn to_caller(&self, p: Point) -> Point {
        self.offset + p
    }
}

/// Configurable grid search over a set of sparse tiles.
///
/// Must be rebuilt whenever the tile set changes. Searching before the first
/// build, or after building from no tiles, finds nothing.
pub struct TileFinder {
    engine: GridAstar,
    heuristic: Option<Heuristic>,
    layout: Option<Layout>,
}

impl fmt::Debug for TileFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileFinder")
            .field("engine", &self.engine)
            .field("custom_heuristic", &self.heuristic.is_some())
            .field("bounds", &self.bounds())
            .finish()
    }
}

impl TileFinder {
    /// Create an unbuilt finder with the given movement rules.
    pub fn new(config: GridConfig) -> Result<Self, SearchError> {
        Ok(Self {
            engine: GridAstar::new(config)?,
            heuristic: None,
            layout: None,
        })
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        self.engine.config()
    }

    /// Replace the movement rules. The built layout is kept.
    pub fn set_config(&mut self, config: GridConfig) -> Result<(), SearchError> {
        self.engine = GridAstar::new(config)?.with_limits(self.engine.limits());
        Ok(())
    }

    /// Enable or disable diagonal moves.
    pub fn set_diagonal(&mut self, diagonal: bool) -> Result<(), SearchError> {
        self.set_config(self.config().with_diagonal(diagonal))
    }

    /// Set the straight and diagonal step costs.
    pub fn set_costs(&mut self, straight: i32, diagonal: i32) -> Result<(), SearchError> {
        self.set_config(self.config().with_costs(straight, diagonal))
    }

    pub fn set_limits(&mut self, limits: SearchLimits) {
        self.engine = self.engine.clone().with_limits(limits);
    }

    /// Override the default octile heuristic. It receives caller
    /// coordinates.
    pub fn set_heuristic(&mut self, heuristic: impl Fn(Point, Point) -> i64 + Send + Sync + 'static) {
        self.heuristic = Some(Box::new(heuristic));
    }

    /// Restore the default heuristic.
    pub fn clear_heuristic(&mut self) {
        self.heuristic = None;
    }

    /// Pack `tiles` into a dense grid covering their bounding rectangle.
    ///
    /// Positions inside the rectangle without a tile are blocked. When two
    /// tiles share a position the later one wins.
    ///
    /// Fails with [`SearchError::LayoutTooLarge`] when a side of the
    /// rectangle exceeds `i32::MAX` tiles; the previous layout is kept.
    pub fn build<T: Tile>(&mut self, tiles: impl IntoIterator<Item = T>) -> Result<(), SearchError> {
        let tiles: Vec<(Point, bool)> = tiles
            .into_iter()
            .map(|t| (t.position(), !t.is_blocked()))
            .collect();
        let Some((min, max)) = corners(tiles.iter().map(|&(p, _)| p)) else {
            debug!("tiles: build from an empty tile set");
            self.layout = None;
            return Ok(());
        };

        let width = i64::from(max.x) - i64::from(min.x) + 1;
        let height = i64::from(max.y) - i64::from(min.y) + 1;
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(SearchError::LayoutTooLarge { width, height });
        };

        let mut layout = Layout {
            offset: min,
            grid: PassGrid::filled(w, h, false),
        };
        for (p, passable) in tiles {
            if let Some(local) = layout.to_grid(p) {
                layout.grid.set_passable(local, passable);
            }
        }
        debug!("tiles: built {w}x{h} grid at offset {min}");
        self.layout = Some(layout);
        Ok(())
    }

    /// Whether a non-empty tile set has been built.
    #[inline]
    pub fn is_built(&self) -> bool {
        self.layout.is_some()
    }

    /// Inclusive corners `(min, max)` of the built tiles' bounding
    /// rectangle, in caller coordinates.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        self.layout.as_ref().map(|l| {
            let far = Point::new(l.grid.width() - 1, l.grid.height() - 1);
            (l.offset, l.to_caller(far))
        })
    }

    /// Whether the tile at caller position `p` was built as passable.
    pub fn is_passable(&self, p: Point) -> bool {
        let Some(l) = &self.layout else {
            return false;
        };
        l.to_grid(p).is_some_and(|q| l.grid.is_passable(q))
    }

    /// Shortest path between two caller positions, in caller coordinates.
    ///
    /// Returns `Ok(None)` if nothing has been built, an endpoint lies outside
    /// the built tiles or is blocked, or no path exists.
    pub fn find(&self, start: Point, target: Point) -> Result<Option<GridPath>, SearchError> {
        let Some(layout) = &self.layout else {
            debug!("tiles: find called before build");
            return Ok(None);
        };
        let (Some(s), Some(t)) = (layout.to_grid(start), layout.to_grid(target)) else {
            debug!("tiles: endpoint {start} or {target} lies outside the built tiles");
            return Ok(None);
        };
        let found = match &self.heuristic {
            Some(h) => self.engine.find_path_with(&layout.grid, s, t, |a, b| {
                h(layout.to_caller(a), layout.to_caller(b))
            })?,
            None => self.engine.find_path(&layout.grid, s, t)?,
        };
        Ok(found.map(|path| path.translate(layout.offset)))
    }
}

/// Inclusive bounding corners of `points`, or `None` when there are none.
fn corners(points: impl IntoIterator<Item = Point>) -> Option<(Point, Point)> {
    points.into_iter().fold(None, |acc, p| {
        let (min, max) = acc.unwrap_or((p, p));
        Some((
            Point::new(min.x.min(p.x), min.y.min(p.y)),
            Point::new(max.x.max(p.x), max.y.max(p.y)),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug)]
    struct Cell {
        x: i32,
        y: i32,
        wall: bool,
    }

    impl Tile for Cell {
        fn position(&self) -> Point {
            Point::new(self.x, self.y)
        }

        fn is_blocked(&self) -> bool {
            self.wall
        }
    }

    /// Tiles of `rows` with the top-left character at `origin`.
    fn tiles_at(origin: Point, rows: &[&str]) -> Vec<Cell> {
        let mut out = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                out.push(Cell {
                    x: origin.x + x as i32,
                    y: origin.y + y as i32,
                    wall: ch == '#',
                });
            }
        }
        out
    }

    #[test]
    fn find_before_build_is_none() {
        let finder = TileFinder::new(GridConfig::default()).unwrap();
        assert!(!finder.is_built());
        assert_eq!(finder.bounds(), None);
        assert_eq!(finder.find(Point::ZERO, Point::new(1, 1)), Ok(None));
    }

    #[test]
    fn empty_build_finds_nothing() {
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder.build(Vec::<Cell>::new()).unwrap();
        assert!(!finder.is_built());
        assert_eq!(finder.find(Point::ZERO, Point::ZERO), Ok(None));
    }

    #[test]
    fn negative_coordinates_are_reindexed() {
        let origin = Point::new(-5, -7);
        let tiles = tiles_at(origin, &["---", "---", "---"]);
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder.build(&tiles).unwrap();
        assert_eq!(finder.bounds(), Some((Point::new(-5, -7), Point::new(-3, -5))));

        let path = finder
            .find(origin, origin.shift(2, 2))
            .unwrap()
            .unwrap();
        assert_eq!(
            path.tiles(),
            &[origin, origin.shift(1, 1), origin.shift(2, 2)]
        );
        assert_eq!(path.cost(), 28);
    }

    #[test]
    fn configuration_surface() {
        let tiles = tiles_at(Point::new(100, 40), &["---", "---", "---"]);
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder.build(tiles.iter()).unwrap();
        let (a, b) = (Point::new(100, 40), Point::new(102, 42));

        finder.set_diagonal(false).unwrap();
        let path = finder.find(a, b).unwrap().unwrap();
        assert_eq!((path.steps(), path.cost()), (4, 40));

        finder.set_costs(3, 5).unwrap();
        assert_eq!(finder.find(a, b).unwrap().unwrap().cost(), 12);

        finder.set_diagonal(true).unwrap();
        assert_eq!(finder.find(a, b).unwrap().unwrap().cost(), 10);

        assert!(finder.set_costs(0, 5).is_err());
        // A rejected update leaves the previous rules in place.
        assert_eq!(finder.config().straight_cost, 3);
    }

    #[test]
    fn gaps_in_the_tile_set_are_blocked() {
        // The missing middle column splits the two halves.
        let tiles = tiles_at(Point::new(10, 10), &["- -", "- -", "- -"]);
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder.build(&tiles).unwrap();
        assert!(!finder.is_passable(Point::new(11, 11)));
        assert!(finder.is_passable(Point::new(10, 11)));
        assert_eq!(finder.find(Point::new(10, 10), Point::new(12, 12)), Ok(None));
    }

    #[test]
    fn walls_and_outside_points() {
        let tiles = tiles_at(Point::new(0, 0), &["-#-", "-#-", "---"]);
        let mut finder = TileFinder::new(GridConfig::default().with_diagonal(false)).unwrap();
        finder.build(&tiles).unwrap();
        let path = finder
            .find(Point::new(0, 0), Point::new(2, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path.steps(), 6);
        assert_eq!(path.cost(), 60);
        assert_eq!(finder.find(Point::new(1, 0), Point::new(2, 0)), Ok(None));
        assert_eq!(finder.find(Point::new(-1, 0), Point::new(2, 0)), Ok(None));
    }

    #[test]
    fn rebuild_replaces_the_layout() {
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder.build(&tiles_at(Point::ZERO, &["--"])).unwrap();
        assert!(finder.find(Point::ZERO, Point::new(1, 0)).unwrap().is_some());
        finder.build(&tiles_at(Point::new(50, 50), &["--"])).unwrap();
        assert_eq!(finder.find(Point::ZERO, Point::new(1, 0)), Ok(None));
        assert!(
            finder
                .find(Point::new(50, 50), Point::new(51, 50))
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn later_duplicates_win() {
        let tiles = [
            Cell { x: 0, y: 0, wall: false },
            Cell { x: 1, y: 0, wall: false },
            Cell { x: 1, y: 0, wall: true },
        ];
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder.build(tiles).unwrap();
        assert!(!finder.is_passable(Point::new(1, 0)));
    }

    #[test]
    fn tiles_at_the_edges_of_the_coordinate_space() {
        let (max, min) = (i32::MAX, i32::MIN);
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder
            .build([
                Cell { x: max, y: 0, wall: false },
                Cell { x: max - 1, y: 0, wall: false },
            ])
            .unwrap();
        assert_eq!(
            finder.bounds(),
            Some((Point::new(max - 1, 0), Point::new(max, 0)))
        );
        let path = finder
            .find(Point::new(max - 1, 0), Point::new(max, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path.tiles(), &[Point::new(max - 1, 0), Point::new(max, 0)]);
        assert_eq!(path.cost(), 10);
        // Far-away queries are simply outside the layout.
        assert_eq!(finder.find(Point::new(min, min), Point::new(max, 0)), Ok(None));
        assert!(!finder.is_passable(Point::new(min, 0)));

        finder
            .build([
                Cell { x: min, y: min, wall: false },
                Cell { x: min + 1, y: min, wall: false },
            ])
            .unwrap();
        let path = finder
            .find(Point::new(min, min), Point::new(min + 1, min))
            .unwrap()
            .unwrap();
        assert_eq!(path.target(), Point::new(min + 1, min));
    }

    #[test]
    fn oversized_layout_is_rejected() {
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder.build(&tiles_at(Point::ZERO, &["--"])).unwrap();
        let err = finder
            .build([
                Cell { x: i32::MIN, y: 0, wall: false },
                Cell { x: i32::MAX, y: 0, wall: false },
            ])
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::LayoutTooLarge {
                width: 1 << 32,
                height: 1
            }
        );
        // The previous layout survives the failed build.
        assert!(finder.find(Point::ZERO, Point::new(1, 0)).unwrap().is_some());
    }

    #[test]
    fn custom_heuristic_sees_caller_coordinates() {
        use std::sync::Mutex;
        use std::sync::Arc;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let tiles = tiles_at(Point::new(-3, 8), &["----"]);
        let mut finder = TileFinder::new(GridConfig::default()).unwrap();
        finder.build(&tiles).unwrap();
        let log = Arc::clone(&seen);
        finder.set_heuristic(move |a, b| {
            log.lock().unwrap().push((a, b));
            0
        });
        let path = finder
            .find(Point::new(-3, 8), Point::new(0, 8))
            .unwrap()
            .unwrap();
        assert_eq!(path.cost(), 30);
        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|&(_, b)| b == Point::new(0, 8)));
        assert!(seen.iter().all(|&(a, _)| a.y == 8 && (-3..=0).contains(&a.x)));
        drop(seen);

        finder.set_heuristic(|_, _| -1);
        assert!(finder.find(Point::new(-3, 8), Point::new(0, 8)).is_err());
        finder.clear_heuristic();
        assert!(finder.find(Point::new(-3, 8), Point::new(0, 8)).is_ok());
    }
}
