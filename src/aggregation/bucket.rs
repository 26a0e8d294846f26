//! Per-tile buckets and the sub-aggregation merge capability.

use crate::tile::{self, TileKey};
use serde::{Deserialize, Serialize};
use tilegrid_types::BoundingBox;

/// Aggregated result for one tile.
///
/// `aggregations` is owned by whatever nested aggregation the host runs
/// under each tile; this crate never looks inside it, it only merges it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket<A = ()> {
    pub key: TileKey,
    pub doc_count: u64,
    pub aggregations: A,
}

impl<A> Bucket<A> {
    pub fn new(key: TileKey, doc_count: u64, aggregations: A) -> Self {
        Self {
            key,
            doc_count,
            aggregations,
        }
    }

    /// Quad path rendered as its digit string.
    pub fn key_as_string(&self) -> String {
        self.key.to_string()
    }

    /// Geographic extent of this bucket's tile.
    pub fn bounds(&self) -> BoundingBox {
        tile::decode(&self.key)
    }
}

impl Bucket<()> {
    /// A bucket with no sub-aggregations.
    pub fn count_only(key: TileKey, doc_count: u64) -> Self {
        Self::new(key, doc_count, ())
    }
}

/// Merges the sub-aggregation results of same-tile buckets.
///
/// Implementations must be associative and commutative: buckets reach the
/// reducer in shard order, and partial reductions may be reduced again.
pub trait AggregationMerger<A> {
    fn merge(&self, parts: Vec<A>) -> A;
}

impl<A, F> AggregationMerger<A> for F
where
    F: Fn(Vec<A>) -> A,
{
    fn merge(&self, parts: Vec<A>) -> A {
        self(parts)
    }
}

/// Merge capability (and wire codec) for buckets without sub-aggregations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSubAggregations;

impl AggregationMerger<()> for NoSubAggregations {
    fn merge(&self, _parts: Vec<()>) {}
}

/// Count/sum/min/max of a numeric sub-field across a tile's documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    /// Identity element: merging it changes nothing.
    pub fn empty() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Stats of a single observed value.
    pub fn of(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            min: value,
            max: value,
        }
    }

    pub fn combine(&mut self, other: &Stats) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn avg(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Merge capability (and wire codec) for [`Stats`] payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsMerger;

impl AggregationMerger<Stats> for StatsMerger {
    fn merge(&self, parts: Vec<Stats>) -> Stats {
        parts.iter().fold(Stats::empty(), |mut acc, part| {
            acc.combine(part);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_merge() {
        let merged = StatsMerger.merge(vec![Stats::of(3.0), Stats::of(-1.0), Stats::of(10.0)]);
        assert_eq!(merged.count, 3);
        assert_eq!(merged.sum, 12.0);
        assert_eq!(merged.min, -1.0);
        assert_eq!(merged.max, 10.0);
        assert_eq!(merged.avg(), Some(4.0));
        assert_eq!(StatsMerger.merge(vec![]), Stats::empty());
        assert_eq!(Stats::empty().avg(), None);
    }

    #[test]
    fn test_closure_merger() {
        let sum = |parts: Vec<u32>| parts.into_iter().sum::<u32>();
        assert_eq!(sum.merge(vec![1, 2, 3]), 6);
    }

    #[test]
    fn test_bucket_accessors() {
        let key: TileKey = "1321".parse().unwrap();
        let bucket = Bucket::count_only(key, 7);
        assert_eq!(bucket.key_as_string(), "1321");
        assert!(bucket.bounds().contains(39.8775, 116.316));
    }
}
