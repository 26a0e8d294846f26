//! Bucket aggregation: per-shard collection, cross-shard reduction and
//! top-K trimming.

pub mod bucket;
pub mod collector;
pub mod grid;
pub mod reduce;
pub mod top_k;

pub use bucket::{AggregationMerger, Bucket, NoSubAggregations, Stats, StatsMerger};
pub use collector::ShardCollector;
pub use grid::TileGrid;
pub use reduce::BucketReducer;
pub use top_k::{TopK, TopKSelector, compare_buckets, select};
