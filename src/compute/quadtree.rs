//! Quadtree subdivision of pyramid pixel space.
//!
//! A quad path is carried as its base-4 integer: the first digit is the most
//! significant. Digit bit 0 selects the right half, bit 1 the bottom half.

use tilegrid_types::Level;

const RIGHT: u64 = 1;
const BOTTOM: u64 = 2;

/// Pixel rectangle `[x_min, x_max] × [y_min, y_max]` covered by a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x_min: u64,
    pub x_max: u64,
    pub y_min: u64,
    pub y_max: u64,
}

impl PixelRect {
    /// The whole world square at `level`.
    pub fn world(level: Level) -> Self {
        let n = level.pixels_per_axis();
        Self {
            x_min: 0,
            x_max: n,
            y_min: 0,
            y_max: n,
        }
    }

    pub fn contains(&self, x: u64, y: u64) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// Narrow to the quadrant selected by `digit`.
    fn narrow(&mut self, digit: u64) {
        let cx = (self.x_min + self.x_max) >> 1;
        let cy = (self.y_min + self.y_max) >> 1;
        if digit & RIGHT != 0 {
            self.x_min = cx;
        } else {
            self.x_max = cx;
        }
        if digit & BOTTOM != 0 {
            self.y_min = cy;
        } else {
            self.y_max = cy;
        }
    }
}

/// Descend `level` times towards pixel `(x, y)` and return the quad path.
///
/// A pixel lying exactly on a midpoint belongs to the left/top half.
pub fn subdivide(x: u64, y: u64, level: Level) -> u64 {
    let mut rect = PixelRect::world(level);
    let mut path = 0u64;

    for _ in 0..level.get() {
        let cx = (rect.x_min + rect.x_max) >> 1;
        let cy = (rect.y_min + rect.y_max) >> 1;
        let mut digit = 0;
        if x > cx {
            digit |= RIGHT;
        }
        if y > cy {
            digit |= BOTTOM;
        }
        rect.narrow(digit);
        path = (path << 2) | digit;
    }

    path
}

/// Replay a quad path of `level` digits and return the pixel rectangle it names.
pub fn tile_rect(path: u64, level: Level) -> PixelRect {
    let mut rect = PixelRect::world(level);
    for depth in (0..level.get()).rev() {
        let digit = (path >> (2 * depth as u32)) & 0b11;
        rect.narrow(digit);
    }
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(l: u8) -> Level {
        Level::new(l).unwrap()
    }

    #[test]
    fn test_root_has_empty_path() {
        assert_eq!(subdivide(17, 99, Level::ROOT), 0);
        assert_eq!(tile_rect(0, Level::ROOT), PixelRect::world(Level::ROOT));
    }

    #[test]
    fn test_midpoint_goes_left_and_up() {
        // World is 512 pixels at level 1; midpoint is 256.
        assert_eq!(subdivide(256, 256, level(1)), 0);
        assert_eq!(subdivide(257, 256, level(1)), 1);
        assert_eq!(subdivide(256, 257, level(1)), 2);
        assert_eq!(subdivide(511, 511, level(1)), 3);
    }

    #[test]
    fn test_rect_of_single_digit() {
        let rect = tile_rect(3, level(1));
        assert_eq!(
            rect,
            PixelRect {
                x_min: 256,
                x_max: 512,
                y_min: 256,
                y_max: 512
            }
        );
    }

    #[test]
    fn test_final_tile_is_256_pixels() {
        let l = level(6);
        let path = subdivide(5_000, 12_345, l);
        let rect = tile_rect(path, l);
        assert_eq!(rect.x_max - rect.x_min, 256);
        assert_eq!(rect.y_max - rect.y_min, 256);
        assert!(rect.contains(5_000, 12_345));
    }

    #[test]
    fn test_subdivide_then_rect_contains_pixel() {
        let l = level(9);
        let n = l.pixels_per_axis();
        for &(x, y) in &[(0, 0), (n - 1, n - 1), (n / 2, n / 2), (n / 2 + 1, 7), (1234, 98_765)] {
            let rect = tile_rect(subdivide(x, y, l), l);
            assert!(rect.contains(x, y), "pixel ({x}, {y}) outside {rect:?}");
        }
    }
}
