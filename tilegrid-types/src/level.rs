use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length, in pixels, of a single tile.
pub const PIXELS_PER_TILE: u64 = 256;

/// Deepest supported level: `4^31 - 1` is the largest tile id that still fits
/// a signed 64-bit wire field.
pub const MAX_LEVEL: u8 = 31;

/// Level used when none is configured.
pub const DEFAULT_LEVEL: u8 = 20;

/// A level of detail of the tile pyramid.
///
/// At level `L` the projected world square is `256 · 2^L` pixels wide and is
/// addressed by quad paths of exactly `L` digits.
///
/// # Examples
///
/// ```
/// use tilegrid_types::level::Level;
///
/// let level = Level::new(20).unwrap();
/// assert_eq!(level.get(), 20);
/// assert_eq!(level.tile_count(), 1 << 40);
///
/// assert!(Level::new(32).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// The root of the pyramid: a single tile, addressed by the empty path.
    pub const ROOT: Level = Level(0);

    /// Create a level, returning `None` when it exceeds [`MAX_LEVEL`].
    pub const fn new(level: u8) -> Option<Self> {
        if level <= MAX_LEVEL {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Number of digits in a quad path at this level.
    pub const fn digits(self) -> usize {
        self.0 as usize
    }

    /// Width (and height) of the projected world square in pixels.
    pub const fn pixels_per_axis(self) -> u64 {
        PIXELS_PER_TILE << self.0
    }

    /// Number of distinct tiles at this level, `4^L`.
    pub const fn tile_count(self) -> u64 {
        1u64 << (2 * self.0 as u32)
    }

    /// Largest integer tile id representable at this level.
    pub const fn max_tile_id(self) -> u64 {
        self.tile_count() - 1
    }

    /// The next coarser level, or `None` at the root.
    pub const fn parent(self) -> Option<Self> {
        if self.0 == 0 {
            None
        } else {
            Some(Self(self.0 - 1))
        }
    }

    /// The next finer level, or `None` at [`MAX_LEVEL`].
    pub const fn child(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(DEFAULT_LEVEL)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(LevelOutOfRange(value))
    }
}

/// Returned when a level of detail exceeds [`MAX_LEVEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutOfRange(pub u8);

impl fmt::Display for LevelOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level of detail {} out of range [0, {}]",
            self.0, MAX_LEVEL
        )
    }
}

impl std::error::Error for LevelOutOfRange {}
