//! Validation for geographic coordinates.
//!
//! This is the wide validity range of a document's location. It is distinct
//! from the Mercator clamp, which only narrows the band used for projection.

use crate::error::{Result, TileGridError};
use geo::Point;

/// Validates a latitude/longitude pair.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0], both finite.
///
/// # Examples
///
/// ```
/// use tilegrid::compute::validation::validate_coordinate;
///
/// assert!(validate_coordinate(40.7128, -74.0060).is_ok());
/// assert!(validate_coordinate(95.0, -74.0).is_err());
/// assert!(validate_coordinate(40.0, f64::NAN).is_err());
/// ```
pub fn validate_coordinate(lat: f64, lon: f64) -> Result<()> {
    let valid = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);

    if valid {
        Ok(())
    } else {
        Err(TileGridError::InvalidCoordinate { lat, lon })
    }
}

/// Validates a `geo::Point` (x = longitude, y = latitude).
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    validate_coordinate(point.y(), point.x())
}

/// Validates multiple points, reporting the index of the first bad one.
pub fn validate_points(points: &[Point]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_geographic_point(point)
            .map_err(|e| TileGridError::InvalidInput(format!("Point at index {}: {}", idx, e)))?;
    }
    Ok(())
}
