use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Geographic extent of a tile, in degrees.
///
/// Edges are named geographically: `north >= south` and `east >= west`.
/// Tiles never straddle the antimeridian, so `west <= east` always holds for
/// boxes produced by the tile decoder.
///
/// # Examples
///
/// ```
/// use tilegrid_types::bbox::BoundingBox;
///
/// let bbox = BoundingBox::new(40.8, 40.7, -73.9, -74.0);
/// assert!(bbox.contains(40.75, -73.95));
/// assert!(!bbox.contains(41.0, -73.95));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Inclusive containment test for a latitude/longitude pair.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Inclusive containment test for a `geo::Point` (x = longitude, y = latitude).
    pub fn contains_point(&self, point: &Point) -> bool {
        self.contains(point.y(), point.x())
    }

    /// Returns true if `other` lies entirely within this box (shared edges allowed).
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.north <= self.north
            && other.south >= self.south
            && other.east <= self.east
            && other.west >= self.west
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Centre of the box in degree space (not the projected centre).
    pub fn center(&self) -> Point {
        Point::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// Convert to a `geo::Rect` with x = longitude and y = latitude.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.west, y: self.south },
            geo::coord! { x: self.east, y: self.north },
        )
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self {
            north: rect.max().y,
            south: rect.min().y,
            east: rect.max().x,
            west: rect.min().x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges_inclusive() {
        let bbox = BoundingBox::new(10.0, 0.0, 20.0, 5.0);
        assert!(bbox.contains(0.0, 5.0));
        assert!(bbox.contains(10.0, 20.0));
        assert!(!bbox.contains(10.1, 10.0));
        assert!(bbox.contains_point(&Point::new(12.0, 4.0)));
    }

    #[test]
    fn test_contains_box() {
        let outer = BoundingBox::new(10.0, 0.0, 20.0, 0.0);
        let inner = BoundingBox::new(10.0, 5.0, 10.0, 0.0);
        assert!(outer.contains_box(&inner));
        assert!(!inner.contains_box(&outer));
        assert!(outer.contains_box(&outer));
    }

    #[test]
    fn test_rect_conversion() {
        let bbox = BoundingBox::new(51.6, 51.4, 0.0, -0.35);
        let rect = bbox.to_rect();
        assert_eq!(rect.min().x, -0.35);
        assert_eq!(rect.max().y, 51.6);
        assert_eq!(BoundingBox::from(rect), bbox);
        assert!((bbox.width() - 0.35).abs() < 1e-12);
    }
}
