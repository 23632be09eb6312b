//! Spherical Web Mercator (EPSG:3857) forward and inverse projection.

use geo_types::Coord;
use std::f64::consts::PI;

// ── Sphere constants ─────────────────────────────────────────────────────

/// Radius of the Web Mercator sphere (m).
pub const RADIUS: f64 = 6_378_137.0;
/// Half the width of the projected world (m).
pub const HALF_SIZE: f64 = PI * RADIUS;
/// Latitude at which the projected world becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Project WGS84 longitude/latitude (degrees) to Web Mercator metres.
///
/// Latitude is clamped to ±[`MAX_LATITUDE`] so poles and out-of-range input
/// land on the edge of the square world instead of producing infinities.
pub fn from_lon_lat(lon: f64, lat: f64) -> Coord<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = RADIUS * lon.to_radians();
    let y = RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    Coord {
        x,
        y: y.clamp(-HALF_SIZE, HALF_SIZE),
    }
}

/// Unproject Web Mercator metres to WGS84 longitude/latitude (degrees).
pub fn to_lon_lat(x: f64, y: f64) -> Coord<f64> {
    let lon = (x / RADIUS).to_degrees();
    let lat = (2.0 * (y / RADIUS).exp().atan() - PI / 2.0).to_degrees();
    Coord { x: lon, y: lat }
}
