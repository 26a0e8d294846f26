//! Merging partial bucket sets from several shards.

use super::bucket::{AggregationMerger, Bucket};
use super::top_k::TopK;
use crate::tile::TileKey;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Same-key buckets gathered during one reduce call.
struct Group<A> {
    key: TileKey,
    doc_count: u64,
    parts: SmallVec<[A; 4]>,
}

/// Merges per-shard bucket sets into one globally consistent, trimmed set.
///
/// Buckets are grouped by exact tile key only; nearby tiles are never merged.
/// Document counts are summed and sub-aggregations are combined with the
/// injected merge capability.
///
/// # Examples
///
/// ```rust
/// use tilegrid::{Bucket, BucketReducer, NoSubAggregations, TileKey};
///
/// let key: TileKey = "0312".parse()?;
/// let other: TileKey = "0313".parse()?;
/// let shard_a = vec![Bucket::count_only(key, 3), Bucket::count_only(other, 4)];
/// let shard_b = vec![Bucket::count_only(key, 2)];
///
/// let reducer = BucketReducer::new(NoSubAggregations);
/// let merged = reducer.reduce(vec![shard_a, shard_b], 10);
/// assert_eq!(merged[0].key, key);
/// assert_eq!(merged[0].doc_count, 5);
/// assert_eq!(merged[1].doc_count, 4);
/// # Ok::<(), tilegrid::TileGridError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BucketReducer<M> {
    merger: M,
}

impl<M> BucketReducer<M> {
    pub fn new(merger: M) -> Self {
        Self { merger }
    }

    pub fn merger(&self) -> &M {
        &self.merger
    }

    /// Reduce partial result sets and keep the `required_size` best buckets.
    ///
    /// Every bucket of every partial set is considered; the output is ordered
    /// by descending `doc_count`, ties by ascending key.
    pub fn reduce<A, I>(&self, partials: I, required_size: usize) -> Vec<Bucket<A>>
    where
        M: AggregationMerger<A>,
        I: IntoIterator<Item = Vec<Bucket<A>>>,
    {
        let mut index: FxHashMap<TileKey, usize> = FxHashMap::default();
        let mut groups: Vec<Group<A>> = Vec::new();
        let mut seen = 0usize;

        for partial in partials {
            if index.is_empty() {
                index.reserve(partial.len());
            }
            seen += partial.len();

            for bucket in partial {
                match index.get(&bucket.key) {
                    Some(&slot) => {
                        let group = &mut groups[slot];
                        group.doc_count = group.doc_count.saturating_add(bucket.doc_count);
                        group.parts.push(bucket.aggregations);
                    }
                    None => {
                        index.insert(bucket.key, groups.len());
                        let mut parts = SmallVec::new();
                        parts.push(bucket.aggregations);
                        groups.push(Group {
                            key: bucket.key,
                            doc_count: bucket.doc_count,
                            parts,
                        });
                    }
                }
            }
        }
        drop(index);

        let distinct = groups.len();
        let mut top = TopK::with_expected(required_size, distinct);
        for group in groups {
            let aggregations = self.merger.merge(group.parts.into_vec());
            top.offer(Bucket::new(group.key, group.doc_count, aggregations));
        }

        let reduced = top.into_sorted_vec();
        log::debug!(
            "reduced {} buckets into {} tiles, kept {}",
            seen,
            distinct,
            reduced.len()
        );
        reduced
    }
}
