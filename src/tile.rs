//! Tile keys and the coder that maps coordinates onto them.
//!
//! ```rust
//! use tilegrid::{TileCoder, TileKey};
//! use tilegrid::types::Level;
//!
//! let coder = TileCoder::new(Level::new(4).unwrap());
//! let key = coder.encode(39.8775, 116.316);
//! assert_eq!(key.to_string(), "1321");
//!
//! let bounds = coder.decode(&key);
//! assert!(bounds.contains(39.8775, 116.316));
//!
//! let same = TileKey::from_integer(key.to_integer(), key.level())?;
//! assert_eq!(same, key);
//! # Ok::<(), tilegrid::TileGridError>(())
//! ```

use crate::compute::{mercator, quadtree, validation};
use crate::error::{Result, TileGridError};
use geo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tilegrid_types::{BoundingBox, Level, MAX_LEVEL};

/// A quad path through the tile pyramid.
///
/// The canonical form is a string of exactly `L` digits from `{0,1,2,3}`,
/// most significant first. It is held as its base-4 integer together with
/// `L`, so leading `0` digits are never lost.
///
/// Keys order by level first, then by integer value. Within one level this is
/// the same as lexicographic order of the digit strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    level: Level,
    value: u64,
}

impl TileKey {
    /// The single tile covering the whole world.
    pub const ROOT: TileKey = TileKey {
        level: Level::ROOT,
        value: 0,
    };

    /// Rebuild a key from its integer form.
    ///
    /// The integer alone cannot tell how many leading zeros the path had, so
    /// the level must be supplied. `0` decodes to `L` zero digits.
    pub fn from_integer(value: i64, level: Level) -> Result<Self> {
        if value < 0 || value as u64 > level.max_tile_id() {
            return Err(TileGridError::InvalidEncoding {
                value,
                level: level.get(),
            });
        }
        Ok(Self {
            level,
            value: value as u64,
        })
    }

    /// Integer form: `Σ digit_i · 4^(L−i−1)`.
    pub fn to_integer(&self) -> i64 {
        // MAX_LEVEL keeps every value below 2^62.
        self.value as i64
    }

    pub(crate) fn from_path(value: u64, level: Level) -> Self {
        debug_assert!(value <= level.max_tile_id());
        Self { level, value }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// The digit at `depth` (0 = first subdivision), or `None` past the end.
    pub fn digit(&self, depth: usize) -> Option<u8> {
        let len = self.level.digits();
        if depth >= len {
            return None;
        }
        let shift = 2 * (len - depth - 1) as u32;
        Some(((self.value >> shift) & 0b11) as u8)
    }

    /// Digits from the root downwards.
    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.level.digits()).filter_map(move |depth| self.digit(depth))
    }

    /// The enclosing tile one level up, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let level = self.level.parent()?;
        Some(Self {
            level,
            value: self.value >> 2,
        })
    }

    /// The sub-tile selected by `digit` one level down.
    pub fn child(&self, digit: u8) -> Option<Self> {
        if digit > 3 {
            return None;
        }
        let level = self.level.child()?;
        Some(Self {
            level,
            value: (self.value << 2) | digit as u64,
        })
    }

    /// Truncate this path to `level` digits.
    pub fn ancestor(&self, level: Level) -> Option<Self> {
        if level > self.level {
            return None;
        }
        let shift = 2 * (self.level.get() - level.get()) as u32;
        Some(Self {
            level,
            value: self.value >> shift,
        })
    }

    /// True if this tile encloses `other` (a tile encloses itself).
    pub fn is_ancestor_of(&self, other: &TileKey) -> bool {
        other.ancestor(self.level) == Some(*self)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits() {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

impl FromStr for TileKey {
    type Err = TileGridError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_LEVEL as usize {
            return Err(TileGridError::InvalidTileKey(format!(
                "'{}' is longer than {} digits",
                s, MAX_LEVEL
            )));
        }

        let mut value = 0u64;
        for c in s.chars() {
            let digit = match c {
                '0'..='3' => c as u64 - '0' as u64,
                _ => {
                    return Err(TileGridError::InvalidTileKey(format!(
                        "'{}' contains '{}', expected digits 0-3",
                        s, c
                    )));
                }
            };
            value = (value << 2) | digit;
        }

        let level = Level::try_from(s.len() as u8)?;
        Ok(Self { level, value })
    }
}

impl Serialize for TileKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TileKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Encode a coordinate as a tile key at `level`.
///
/// Total for every input: latitude is clamped to the Mercator band and
/// longitude to `[-180, 180]` before projecting.
pub fn encode(lat: f64, lon: f64, level: Level) -> TileKey {
    let (x, y) = mercator::lat_lon_to_pixel(lat, lon, level);
    TileKey::from_path(quadtree::subdivide(x, y, level), level)
}

/// Geographic extent of a tile. The level is the key's own.
pub fn decode(key: &TileKey) -> BoundingBox {
    let level = key.level();
    let rect = quadtree::tile_rect(key.value(), level);
    let (north, west) = mercator::pixel_to_lat_lon(rect.x_min, rect.y_min, level);
    let (south, east) = mercator::pixel_to_lat_lon(rect.x_max, rect.y_max, level);
    BoundingBox::new(north, south, east, west)
}

/// Tile coder bound to one level of detail.
///
/// Cheap to copy and free of shared state; build one wherever it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileCoder {
    level: Level,
}

impl TileCoder {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Build from a raw level, rejecting levels above the maximum.
    pub fn with_level(level: u8) -> Result<Self> {
        Ok(Self::new(Level::try_from(level)?))
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// See [`encode`].
    pub fn encode(&self, lat: f64, lon: f64) -> TileKey {
        encode(lat, lon, self.level)
    }

    /// Validate a document location, then encode it.
    ///
    /// Unlike [`TileCoder::encode`], this rejects coordinates outside
    /// lat [-90, 90] / lon [-180, 180] with `InvalidCoordinate`.
    pub fn encode_point(&self, point: &Point) -> Result<TileKey> {
        validation::validate_geographic_point(point)?;
        Ok(self.encode(point.y(), point.x()))
    }

    /// See [`decode`].
    pub fn decode(&self, key: &TileKey) -> BoundingBox {
        decode(key)
    }

    /// Rebuild a key from its integer form at this coder's level.
    pub fn key_from_integer(&self, value: i64) -> Result<TileKey> {
        TileKey::from_integer(value, self.level)
    }
}
