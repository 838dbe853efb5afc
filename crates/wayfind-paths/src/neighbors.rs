use wayfind_core::Point;

/// Reusable neighbour enumeration for implicit grid graphs.
///
/// Yields the cardinal (4-way) or all (8-way) neighbours of a tile, keeping
/// only those accepted by a predicate. Enumeration order is fixed, which
/// keeps searches deterministic.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Return 4-directional neighbours of `p` (up, right, down, left),
    /// keeping only those for which `keep` returns `true`.
    pub fn cardinal(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        self.buf.extend(p.neighbors_4().into_iter().filter(|&n| keep(n)));
        &self.buf
    }

    /// Return 8-directional neighbours of `p` in row-major order, keeping
    /// only those for which `keep` returns `true`.
    pub fn all(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let n = p.shift(dx, dy);
                if keep(n) {
                    self.buf.push(n);
                }
            }
        }
        &self.buf
    }
}
