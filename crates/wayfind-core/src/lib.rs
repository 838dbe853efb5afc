//! **wayfind-core** — geometry primitives for the *wayfind* search crates.
//!
//! Provides the integer [`Point`] used to address grid tiles and the
//! half-open [`Range`] rectangle used to lay out dense tile arrays.

pub mod geom;

pub use geom::{Point, Range, RangeIter};
