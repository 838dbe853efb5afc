use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::marker::Cost;

/// A queued node, ordered for use in `BinaryHeap`.
///
/// Ordering is f = g + h ascending, then h ascending, then insertion order.
/// A node whose cost improves is pushed again; the superseded entry is
/// dropped on pop because its node is no longer open.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Entry<K, C> {
    pub(crate) key: K,
    pub(crate) f: C,
    pub(crate) h: C,
    seq: u64,
}

impl<K, C: Cost> Ord for Entry<K, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest first.
        other
            .f
            .cmp_cost(&self.f)
            .then_with(|| other.h.cmp_cost(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<K, C: Cost> PartialOrd for Entry<K, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, C: Cost> PartialEq for Entry<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K, C: Cost> Eq for Entry<K, C> {}

/// Priority-ordered open set.
pub(crate) struct Frontier<K, C> {
    heap: BinaryHeap<Entry<K, C>>,
    seq: u64,
}

impl<K, C: Cost> Frontier<K, C> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Queue `key` with the given g- and h-cost.
    pub(crate) fn push(&mut self, key: K, g: C, h: C) {
        self.heap.push(Entry {
            key,
            f: g.plus(h),
            h,
            seq: self.seq,
        });
        self.seq += 1;
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Entry<K, C>> {
        self.heap.pop()
    }
}
