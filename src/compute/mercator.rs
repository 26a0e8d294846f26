//! Spherical Web-Mercator projection between degrees and pyramid pixels.
//!
//! Pixel space at level `L` is a square of `256 · 2^L` pixels with the origin
//! at the north-west corner: x grows eastwards, y grows southwards.

use std::f64::consts::PI;
use tilegrid_types::Level;

/// Radius of the spherical Earth model, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Equatorial circumference of the spherical Earth model, in meters.
pub const EARTH_CIRCUMFERENCE_METERS: f64 = 2.0 * PI * EARTH_RADIUS_METERS;

/// Latitude band in which Web-Mercator yields a square world.
pub const MIN_LATITUDE: f64 = -85.0511287798;
pub const MAX_LATITUDE: f64 = 85.0511287798;

pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Saturate `value` into `[min, max]`. NaN passes through unchanged.
pub fn clip(value: f64, min: f64, max: f64) -> f64 {
    value.clamp(min, max)
}

/// Clamp a coordinate into the projectable range.
///
/// Returns `(lat, lon)`. Out-of-range input saturates, it never errors.
pub fn clip_coordinate(lat: f64, lon: f64) -> (f64, f64) {
    (
        clip(lat, MIN_LATITUDE, MAX_LATITUDE),
        clip(lon, MIN_LONGITUDE, MAX_LONGITUDE),
    )
}

/// Project a (clamped) coordinate to Mercator meters, returning `(x, y)`.
pub fn lat_lon_to_meters(lat: f64, lon: f64) -> (f64, f64) {
    let (lat, lon) = clip_coordinate(lat, lon);
    let lat = lat.to_radians();
    let lon = lon.to_radians();

    let sin_lat = lat.sin();
    let x = EARTH_RADIUS_METERS * lon;
    let y = EARTH_RADIUS_METERS / 2.0 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln();
    (x, y)
}

/// Ground distance covered by one pixel along the equator at `level`.
pub fn meters_per_pixel(level: Level) -> f64 {
    EARTH_CIRCUMFERENCE_METERS / level.pixels_per_axis() as f64
}

/// Map a coordinate to its pixel at `level`, returning `(x, y)`.
///
/// Rounding adds one half and truncates, so a value exactly halfway between
/// two pixels goes to the higher one. Results are clamped to
/// `[0, pixels_per_axis - 1]`.
pub fn lat_lon_to_pixel(lat: f64, lon: f64, level: Level) -> (u64, u64) {
    let (x_meters, y_meters) = lat_lon_to_meters(lat, lon);
    let max_pixel = (level.pixels_per_axis() - 1) as f64;
    let mpp = meters_per_pixel(level);

    let x = clip((EARTH_CIRCUMFERENCE_METERS / 2.0 + x_meters) / mpp + 0.5, 0.0, max_pixel);
    let y = clip((EARTH_CIRCUMFERENCE_METERS / 2.0 - y_meters) / mpp + 0.5, 0.0, max_pixel);

    // NaN casts to 0, keeping the projection total.
    (x as u64, y as u64)
}

/// Invert the projection for a pixel corner at `level`, returning `(lat, lon)`.
///
/// Accepts `pixels_per_axis` itself so that the far edges of the last tile
/// row/column can be resolved.
pub fn pixel_to_lat_lon(x: u64, y: u64, level: Level) -> (f64, f64) {
    let mpp = meters_per_pixel(level);
    let x_meters = x as f64 * mpp - EARTH_CIRCUMFERENCE_METERS / 2.0;
    let y_meters = EARTH_CIRCUMFERENCE_METERS / 2.0 - y as f64 * mpp;

    let lat = 90.0 - (2.0 * (-y_meters / EARTH_RADIUS_METERS).exp().atan()).to_degrees();
    let lon = (x_meters / EARTH_RADIUS_METERS).to_degrees();
    (lat, lon)
}
