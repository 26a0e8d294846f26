//! Coordinate input forms accepted from documents.
//!
//! A location may be given as `"lat,lon"` text, as a geohash, as an object
//! with `lat`/`lon` fields, or as a `[lon, lat]` array (GeoJSON order).

use crate::error::{Result, TileGridError};
use geo::Point;
use serde::{Deserialize, Serialize};

/// Structured or textual point as it appears in a JSON document.
///
/// # Examples
///
/// ```
/// use tilegrid::compute::point::PointInput;
///
/// let parsed: PointInput = serde_json::from_str(r#"{"lat": 40.7, "lon": -74.0}"#).unwrap();
/// let point = parsed.to_point().unwrap();
/// assert_eq!((point.y(), point.x()), (40.7, -74.0));
///
/// let parsed: PointInput = serde_json::from_str("[-74.0, 40.7]").unwrap();
/// assert_eq!(parsed.to_point().unwrap(), point);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointInput {
    Object { lat: f64, lon: f64 },
    Array([f64; 2]),
    Text(String),
}

impl PointInput {
    /// Resolve to a point with x = longitude, y = latitude.
    ///
    /// No range validation happens here.
    pub fn to_point(&self) -> Result<Point> {
        match self {
            PointInput::Object { lat, lon } => Ok(Point::new(*lon, *lat)),
            PointInput::Array([lon, lat]) => Ok(Point::new(*lon, *lat)),
            PointInput::Text(text) => parse_point(text),
        }
    }
}

/// Parse `"lat,lon"` text, or a geohash when the text has no comma.
///
/// A geohash resolves to the centre of its cell.
///
/// # Examples
///
/// ```
/// use tilegrid::compute::point::parse_point;
///
/// let p = parse_point("39.8775, 116.316").unwrap();
/// assert_eq!((p.y(), p.x()), (39.8775, 116.316));
///
/// let p = parse_point("wx4g0").unwrap();
/// assert!((p.y() - 39.9).abs() < 0.1 && (p.x() - 116.4).abs() < 0.1);
/// ```
pub fn parse_point(text: &str) -> Result<Point> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TileGridError::InvalidInput("Empty point".to_string()));
    }

    match text.split_once(',') {
        Some((lat, lon)) => {
            let lat = parse_number(lat, "latitude", text)?;
            let lon = parse_number(lon, "longitude", text)?;
            Ok(Point::new(lon, lat))
        }
        None => {
            let (center, _, _) = geohash::decode(text).map_err(|e| {
                TileGridError::InvalidInput(format!("Invalid geohash '{}': {}", text, e))
            })?;
            Ok(Point::new(center.x, center.y))
        }
    }
}

fn parse_number(part: &str, what: &str, text: &str) -> Result<f64> {
    part.trim().parse::<f64>().map_err(|_| {
        TileGridError::InvalidInput(format!("Invalid {} in point '{}'", what, text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lon_text() {
        let p = parse_point("-33.8688,151.2093").unwrap();
        assert_eq!(p.y(), -33.8688);
        assert_eq!(p.x(), 151.2093);
    }

    #[test]
    fn test_bad_text() {
        assert!(parse_point("north,east").is_err());
        assert!(parse_point("1.0,").is_err());
        assert!(parse_point("").is_err());
        assert!(parse_point("not-a-geohash!").is_err());
    }

    #[test]
    fn test_geohash_center() {
        let p = parse_point("dr5regw3p").unwrap();
        assert!((p.y() - 40.7128).abs() < 0.001);
        assert!((p.x() + 74.0060).abs() < 0.001);
    }

    #[test]
    fn test_untagged_forms() {
        let text: PointInput = serde_json::from_str(r#""51.5074,-0.1278""#).unwrap();
        assert!(matches!(text, PointInput::Text(_)));
        let p = text.to_point().unwrap();
        assert_eq!((p.y(), p.x()), (51.5074, -0.1278));

        let object: PointInput = serde_json::from_str(r#"{"lat": 1.0, "lon": 2.0}"#).unwrap();
        assert_eq!(object.to_point().unwrap(), Point::new(2.0, 1.0));
    }
}
