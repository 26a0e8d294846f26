//! Bounded top-K selection of buckets.
//!
//! Buckets rank by `doc_count` descending, then by tile key ascending, then
//! by the order in which they were offered. The last rule only matters when
//! the same key is offered twice; it keeps the result reproducible.

use super::bucket::Bucket;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Ranking comparator: `Less` means `a` ranks ahead of `b`.
///
/// Suitable for `sort_by`; a stable sort with it reproduces what
/// [`select`] returns.
pub fn compare_buckets<A>(a: &Bucket<A>, b: &Bucket<A>) -> Ordering {
    b.doc_count
        .cmp(&a.doc_count)
        .then_with(|| a.key.cmp(&b.key))
}

/// Heap entry; "greater" means ranked higher.
struct Ranked<A> {
    bucket: Bucket<A>,
    ordinal: usize,
}

impl<A> PartialEq for Ranked<A> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A> Eq for Ranked<A> {}

impl<A> PartialOrd for Ranked<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Ranked<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_buckets(&other.bucket, &self.bucket)
            .then_with(|| other.ordinal.cmp(&self.ordinal))
    }
}

/// Min-heap holding at most `capacity` of the best buckets offered so far.
pub struct TopK<A> {
    capacity: usize,
    offered: usize,
    heap: BinaryHeap<Reverse<Ranked<A>>>,
}

impl<A> TopK<A> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            offered: 0,
            heap: BinaryHeap::new(),
        }
    }

    /// Like [`TopK::new`], pre-sizing the heap for `expected` offers.
    pub fn with_expected(capacity: usize, expected: usize) -> Self {
        Self {
            capacity,
            offered: 0,
            heap: BinaryHeap::with_capacity(capacity.min(expected)),
        }
    }

    /// Offer a candidate. Returns `false` if it was discarded straight away.
    pub fn offer(&mut self, bucket: Bucket<A>) -> bool {
        let candidate = Ranked {
            bucket,
            ordinal: self.offered,
        };
        self.offered += 1;

        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
            return true;
        }

        if let Some(Reverse(worst)) = self.heap.peek()
            && candidate > *worst
        {
            self.heap.pop();
            self.heap.push(Reverse(candidate));
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of candidates offered, kept or not.
    pub fn offered(&self) -> usize {
        self.offered
    }

    /// Drain the heap into ranking order, best first.
    pub fn into_sorted_vec(mut self) -> Vec<Bucket<A>> {
        let mut results = Vec::with_capacity(self.heap.len());
        // Popping a min-heap yields the worst first.
        while let Some(Reverse(entry)) = self.heap.pop() {
            results.push(entry.bucket);
        }
        results.reverse();
        results
    }
}

/// Selector for the `size` best-ranked buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopKSelector {
    size: usize,
}

impl TopKSelector {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// See [`select`].
    pub fn select<A, I>(&self, buckets: I) -> Vec<Bucket<A>>
    where
        I: IntoIterator<Item = Bucket<A>>,
    {
        select(buckets, self.size)
    }
}

/// Return the `n` best-ranked buckets, best first.
///
/// Runs in O(m log n) time and O(n) space for m candidates. The result holds
/// `min(n, m)` buckets.
pub fn select<A, I>(buckets: I, n: usize) -> Vec<Bucket<A>>
where
    I: IntoIterator<Item = Bucket<A>>,
{
    let buckets = buckets.into_iter();
    let mut top = TopK::with_expected(n, buckets.size_hint().0);
    for bucket in buckets {
        top.offer(bucket);
    }
    log::trace!("selected {} of {} buckets", top.len(), top.offered());
    top.into_sorted_vec()
}
