//! Per-shard accumulation of documents into tile buckets.

use super::bucket::{AggregationMerger, Bucket};
use super::grid::TileGrid;
use super::top_k::TopK;
use crate::compute::point::PointInput;
use crate::error::{Result, TileGridError};
use crate::tile::{TileCoder, TileKey};
use geo::Point;
use rustc_hash::FxHashMap;

struct Slot<A> {
    doc_count: u64,
    aggregations: Option<A>,
}

/// Counts one shard's documents per tile.
///
/// Each document contributes a sub-aggregation payload that is folded into
/// its tile's running payload with the merge capability. [`finish`] trims the
/// result to the shard size and wraps it as a [`TileGrid`].
///
/// [`finish`]: ShardCollector::finish
pub struct ShardCollector<A, M> {
    coder: TileCoder,
    merger: M,
    required_size: usize,
    shard_size: usize,
    ignore_malformed: bool,
    tiles: FxHashMap<TileKey, Slot<A>>,
    docs: u64,
    skipped: u64,
}

impl<A, M> ShardCollector<A, M>
where
    M: AggregationMerger<A>,
{
    pub fn new(coder: TileCoder, merger: M, required_size: usize, shard_size: usize) -> Self {
        Self {
            coder,
            merger,
            required_size,
            shard_size,
            ignore_malformed: false,
            tiles: FxHashMap::default(),
            docs: 0,
            skipped: 0,
        }
    }

    /// Skip (and log) malformed documents instead of failing on them.
    pub fn ignore_malformed(mut self, ignore: bool) -> Self {
        self.ignore_malformed = ignore;
        self
    }

    /// Add one document located at `(lat, lon)`.
    ///
    /// Returns the tile it landed in, or `None` if it was skipped as
    /// malformed.
    pub fn collect(&mut self, lat: f64, lon: f64, payload: A) -> Result<Option<TileKey>> {
        self.collect_point(&Point::new(lon, lat), payload)
    }

    /// Add one document located at `point` (x = longitude, y = latitude).
    pub fn collect_point(&mut self, point: &Point, payload: A) -> Result<Option<TileKey>> {
        match self.coder.encode_point(point) {
            Ok(key) => {
                self.add(key, payload);
                Ok(Some(key))
            }
            Err(err) => self.malformed(err),
        }
    }

    /// Add one document whose location still has to be parsed.
    pub fn collect_input(&mut self, input: &PointInput, payload: A) -> Result<Option<TileKey>> {
        match input.to_point() {
            Ok(point) => self.collect_point(&point, payload),
            Err(err) => self.malformed(err),
        }
    }

    fn add(&mut self, key: TileKey, payload: A) {
        let slot = self.tiles.entry(key).or_insert(Slot {
            doc_count: 0,
            aggregations: None,
        });
        slot.doc_count += 1;
        slot.aggregations = Some(match slot.aggregations.take() {
            Some(running) => self.merger.merge(vec![running, payload]),
            None => payload,
        });
        self.docs += 1;
    }

    fn malformed(&mut self, err: TileGridError) -> Result<Option<TileKey>> {
        if !self.ignore_malformed {
            return Err(err);
        }
        log::warn!("Skipping malformed document location: {}", err);
        self.skipped += 1;
        Ok(None)
    }

    /// Documents accepted so far.
    pub fn doc_count(&self) -> u64 {
        self.docs
    }

    /// Documents skipped as malformed.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Distinct tiles seen so far.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Emit the shard's best `shard_size` buckets.
    pub fn finish(self) -> TileGrid<A> {
        let level = self.coder.level();
        let mut top = TopK::with_expected(self.shard_size, self.tiles.len());
        for (key, slot) in self.tiles {
            if let Some(aggregations) = slot.aggregations {
                top.offer(Bucket::new(key, slot.doc_count, aggregations));
            }
        }

        log::debug!(
            "shard collected {} docs into {} tiles (skipped {}), emitting {}",
            self.docs,
            top.offered(),
            self.skipped,
            top.len()
        );
        TileGrid::from_parts(level, self.required_size, top.into_sorted_vec())
    }
}
