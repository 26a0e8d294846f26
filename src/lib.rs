//! Quadtree tile-grid aggregation over Web-Mercator tiles.
//!
//! Documents are bucketed by the map tile that contains them, bucket sets
//! from many shards are merged, and the most populated tiles are kept.
//!
//! ```rust
//! use tilegrid::TileGridBuilder;
//!
//! let aggregator = TileGridBuilder::new().level_of_detail(10).required_size(3).build()?;
//!
//! let mut shard = aggregator.collector();
//! shard.collect(39.8775, 116.316, ())?;
//! shard.collect(40.7128, -74.0060, ())?;
//! shard.collect(40.7130, -74.0062, ())?;
//!
//! let grid = aggregator.reduce(vec![shard.finish()])?;
//! let top = &grid.buckets()[0];
//! assert_eq!(top.doc_count, 2);
//! assert!(top.bounds().contains(40.7128, -74.0060));
//! # Ok::<(), tilegrid::TileGridError>(())
//! ```

pub mod aggregation;
pub mod builder;
pub mod codec;
pub mod compute;
pub mod config;
pub mod error;
pub mod render;
pub mod tile;

pub use tilegrid_types as types;

pub use aggregation::{
    AggregationMerger, Bucket, BucketReducer, NoSubAggregations, ShardCollector, Stats,
    StatsMerger, TileGrid, TopKSelector, select,
};
pub use builder::{TileGridAggregator, TileGridBuilder};
pub use codec::{PayloadCodec, WireCodec};
pub use compute::point::{PointInput, parse_point};
pub use config::Config;
pub use error::{CodecError, Result, TileGridError};
pub use tile::{TileCoder, TileKey, decode, encode};
pub use types::{BoundingBox, Level};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Result, TileGridAggregator, TileGridBuilder, TileGridError};

    pub use crate::{Bucket, BucketReducer, TileGrid, TopKSelector};

    pub use crate::{AggregationMerger, NoSubAggregations, Stats, StatsMerger};

    pub use crate::{BoundingBox, Level, TileCoder, TileKey};

    pub use crate::{Config, PayloadCodec, WireCodec};

    pub use geo::Point;
}
