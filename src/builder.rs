//! Aggregator builder
//!
//! Wires a [`Config`] together with the host's sub-aggregation merge
//! capability and payload codec. Every component is constructed here and
//! handed out explicitly; nothing is registered globally.

use crate::aggregation::{
    AggregationMerger, Bucket, BucketReducer, NoSubAggregations, ShardCollector, TileGrid,
    TopKSelector,
};
use crate::codec::{PayloadCodec, WireCodec};
use crate::config::Config;
use crate::error::{Result, TileGridError};
use crate::tile::TileCoder;
use bytes::Bytes;
use tilegrid_types::Level;

/// Builder for a [`TileGridAggregator`].
#[derive(Debug, Clone)]
pub struct TileGridBuilder<M = NoSubAggregations, C = NoSubAggregations> {
    config: Config,
    merger: M,
    codec: C,
}

impl TileGridBuilder {
    /// Create a builder with default configuration and no sub-aggregations.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            merger: NoSubAggregations,
            codec: NoSubAggregations,
        }
    }
}

impl Default for TileGridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, C> TileGridBuilder<M, C> {
    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn level_of_detail(mut self, level: u8) -> Self {
        self.config = self.config.with_level_of_detail(level);
        self
    }

    pub fn required_size(mut self, size: usize) -> Self {
        self.config = self.config.with_required_size(size);
        self
    }

    pub fn shard_size(mut self, size: usize) -> Self {
        self.config = self.config.with_shard_size(size);
        self
    }

    pub fn ignore_malformed(mut self, ignore: bool) -> Self {
        self.config = self.config.with_ignore_malformed(ignore);
        self
    }

    /// Set the capability that merges same-tile sub-aggregation payloads.
    pub fn merger<M2>(self, merger: M2) -> TileGridBuilder<M2, C> {
        TileGridBuilder {
            config: self.config,
            merger,
            codec: self.codec,
        }
    }

    /// Set the codec used for sub-aggregation payloads on the wire.
    pub fn payload_codec<C2>(self, codec: C2) -> TileGridBuilder<M, C2> {
        TileGridBuilder {
            config: self.config,
            merger: self.merger,
            codec,
        }
    }

    /// Use one value as both merge capability and payload codec.
    pub fn sub_aggregation<S: Clone>(self, sub: S) -> TileGridBuilder<S, S> {
        TileGridBuilder {
            config: self.config,
            merger: sub.clone(),
            codec: sub,
        }
    }

    /// Validate the configuration and build the aggregator.
    pub fn build(self) -> Result<TileGridAggregator<M, C>> {
        self.config
            .validate()
            .map_err(TileGridError::InvalidConfig)?;
        let level = Level::try_from(self.config.level_of_detail)?;

        log::debug!(
            "tile grid aggregator: level {}, required size {}, shard size {}",
            level,
            self.config.required_size,
            self.config.effective_shard_size()
        );

        Ok(TileGridAggregator {
            coder: TileCoder::new(level),
            reducer: BucketReducer::new(self.merger),
            codec: WireCodec::new(level, self.codec),
            config: self.config,
        })
    }
}

/// Configured entry point for both sides of a distributed tile aggregation.
///
/// Shards call [`collector`](Self::collector) and ship the result with
/// [`encode`](Self::encode); the coordinator [`decode`](Self::decode)s each
/// partial and [`reduce`](Self::reduce)s them.
///
/// # Examples
///
/// ```rust
/// use tilegrid::TileGridBuilder;
///
/// let aggregator = TileGridBuilder::new().level_of_detail(4).required_size(2).build()?;
///
/// let mut shard_a = aggregator.collector();
/// shard_a.collect(39.8775, 116.316, ())?;
/// shard_a.collect(40.7128, -74.0060, ())?;
/// let mut shard_b = aggregator.collector();
/// shard_b.collect(39.90, 116.40, ())?;
///
/// let wire = aggregator.encode(&shard_b.finish())?;
/// let partials = vec![shard_a.finish(), aggregator.decode(wire)?];
/// let grid = aggregator.reduce(partials)?;
///
/// assert_eq!(grid.buckets()[0].key_as_string(), "1321");
/// assert_eq!(grid.buckets()[0].doc_count, 2);
/// # Ok::<(), tilegrid::TileGridError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TileGridAggregator<M = NoSubAggregations, C = NoSubAggregations> {
    config: Config,
    coder: TileCoder,
    reducer: BucketReducer<M>,
    codec: WireCodec<C>,
}

impl<M, C> TileGridAggregator<M, C> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn level(&self) -> Level {
        self.coder.level()
    }

    pub fn coder(&self) -> TileCoder {
        self.coder
    }

    pub fn reducer(&self) -> &BucketReducer<M> {
        &self.reducer
    }

    pub fn wire_codec(&self) -> &WireCodec<C> {
        &self.codec
    }

    /// Selector trimming to the configured required size.
    pub fn selector(&self) -> TopKSelector {
        TopKSelector::new(self.config.required_size)
    }

    /// A fresh collector for one shard.
    pub fn collector<A>(&self) -> ShardCollector<A, M>
    where
        M: AggregationMerger<A> + Clone,
    {
        ShardCollector::new(
            self.coder,
            self.reducer.merger().clone(),
            self.config.required_size,
            self.config.effective_shard_size(),
        )
        .ignore_malformed(self.config.ignore_malformed)
    }

    /// Reduce partial grids produced at this aggregator's level.
    pub fn reduce<A>(&self, partials: Vec<TileGrid<A>>) -> Result<TileGrid<A>>
    where
        M: AggregationMerger<A>,
    {
        if let Some(stray) = partials.iter().find(|g| g.level() != self.level()) {
            return Err(TileGridError::InvalidInput(format!(
                "partial grid at level {}, expected {}",
                stray.level(),
                self.level()
            )));
        }
        TileGrid::reduce(partials, &self.reducer)
    }

    /// Reduce raw bucket lists to the configured required size.
    pub fn reduce_buckets<A>(&self, partials: Vec<Vec<Bucket<A>>>) -> Vec<Bucket<A>>
    where
        M: AggregationMerger<A>,
    {
        self.reducer.reduce(partials, self.config.required_size)
    }

    pub fn encode<A>(&self, grid: &TileGrid<A>) -> Result<Bytes>
    where
        C: PayloadCodec<A>,
    {
        self.codec.encode(grid)
    }

    pub fn decode<A>(&self, bytes: Bytes) -> Result<TileGrid<A>>
    where
        C: PayloadCodec<A>,
    {
        Ok(self.codec.decode(bytes)?)
    }
}
