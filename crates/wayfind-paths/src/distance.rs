//! Distance metrics. Integer metrics are computed in `i64`, so any two
//! `i32` points have a representable distance.

use wayfind_core::Point;

/// Per-axis absolute differences, widened.
#[inline]
fn deltas(a: Point, b: Point) -> (i64, i64) {
    (
        (i64::from(a.x) - i64::from(b.x)).abs(),
        (i64::from(a.y) - i64::from(b.y)).abs(),
    )
}

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i64 {
    let (dx, dy) = deltas(a, b);
    dx + dy
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i64 {
    let (dx, dy) = deltas(a, b);
    dx.max(dy)
}

/// Octile distance for an 8-connected grid where an axis-aligned step costs
/// `straight` and a diagonal step costs `diagonal`.
///
/// Falls back to pure straight moves when they are cheaper than diagonals.
/// Saturates at `i64::MAX`.
#[inline]
pub fn octile(a: Point, b: Point, straight: i32, diagonal: i32) -> i64 {
    let (dx, dy) = deltas(a, b);
    let (lo, hi) = (dx.min(dy), dx.max(dy));
    let (straight, diagonal) = (i64::from(straight), i64::from(diagonal));
    let straight_only = (dx + dy).saturating_mul(straight);
    let mixed = lo
        .saturating_mul(diagonal)
        .saturating_add((hi - lo).saturating_mul(straight));
    straight_only.min(mixed)
}

/// Euclidean distance between two points.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    (f64::from(a.x) - f64::from(b.x)).hypot(f64::from(a.y) - f64::from(b.y))
}
