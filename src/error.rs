//! Error types for tile coding, aggregation and wire decoding.

use thiserror::Error;

/// Errors surfaced by the tilegrid crate.
///
/// Tile encoding itself never fails: out-of-range coordinates are clamped.
/// Errors only arise from inputs that cannot be interpreted at all.
#[derive(Error, Debug)]
pub enum TileGridError {
    #[error("Invalid coordinate: lat {lat}, lon {lon} (expected lat in [-90, 90], lon in [-180, 180])")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Invalid encoding: {value} is not a tile id at level {level}")]
    InvalidEncoding { value: i64, level: u8 },

    #[error("Invalid level of detail: {0}")]
    InvalidLevel(u8),

    #[error("Invalid tile key: {0}")]
    InvalidTileKey(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures while decoding a bucket list from its wire form.
///
/// A decode that fails never yields a partial bucket list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("variable-length integer exceeds 64 bits")]
    VarintOverflow,

    #[error("tile id {tile_id} out of range for level {level}")]
    TileIdOutOfRange { tile_id: i64, level: u8 },

    #[error("payload: {0}")]
    Payload(String),

    #[error("{0} trailing bytes after bucket list")]
    TrailingBytes(usize),
}

impl From<tilegrid_types::LevelOutOfRange> for TileGridError {
    fn from(err: tilegrid_types::LevelOutOfRange) -> Self {
        TileGridError::InvalidLevel(err.0)
    }
}

pub type Result<T> = std::result::Result<T, TileGridError>;
