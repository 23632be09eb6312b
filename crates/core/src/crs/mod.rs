//! Coordinate Reference System handling
//!
//! The viewer only ever moves data between geographic WGS84 (EPSG:4326) and
//! spherical Web Mercator (EPSG:3857), so the transform lives here in pure
//! Rust rather than behind libproj.

mod web_mercator;

use geo::MapCoords;
use geo_types::{Coord, Geometry};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

pub use web_mercator::{from_lon_lat, to_lon_lat, HALF_SIZE, MAX_LATITUDE, RADIUS};

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CRS {
    epsg: u32,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }

    /// Transform a single coordinate from `self` into `target`.
    pub fn transform_coord(&self, target: &CRS, c: Coord<f64>) -> Result<Coord<f64>> {
        match (self.epsg, target.epsg) {
            (a, b) if a == b => Ok(c),
            (4326, 3857) => Ok(from_lon_lat(c.x, c.y)),
            (3857, 4326) => Ok(to_lon_lat(c.x, c.y)),
            _ => Err(self.unsupported(target)),
        }
    }

    /// Transform a geometry from `self` into `target`.
    pub fn transform_geometry(&self, target: &CRS, geom: &Geometry<f64>) -> Result<Geometry<f64>> {
        match (self.epsg, target.epsg) {
            (a, b) if a == b => Ok(geom.clone()),
            (4326, 3857) => Ok(geom.map_coords(|c| from_lon_lat(c.x, c.y))),
            (3857, 4326) => Ok(geom.map_coords(|c| to_lon_lat(c.x, c.y))),
            _ => Err(self.unsupported(target)),
        }
    }

    fn unsupported(&self, target: &CRS) -> Error {
        Error::UnsupportedTransform {
            from: self.identifier(),
            to: target.identifier(),
        }
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, Point};

    #[test]
    fn test_crs_epsg() {
        let crs = CRS::from_epsg(4326);
        assert_eq!(crs.epsg(), 4326);
        assert_eq!(crs.identifier(), "EPSG:4326");
    }

    #[test]
    fn test_crs_equality() {
        assert_eq!(CRS::from_epsg(4326), CRS::wgs84());
        assert_ne!(CRS::wgs84(), CRS::web_mercator());
        assert_eq!(CRS::web_mercator().to_string(), "EPSG:3857");
    }

    #[test]
    fn test_transform_identity() {
        let p = Geometry::Point(Point::new(1.0, 2.0));
        let out = CRS::wgs84().transform_geometry(&CRS::wgs84(), &p).unwrap();
        assert_eq!(out, p);
    }

    #[test]
    fn test_transform_geometry_roundtrip() {
        let ls = Geometry::LineString(line_string![(x: -7.6, y: 33.6), (x: 2.35, y: 48.85)]);
        let merc = CRS::wgs84().transform_geometry(&CRS::web_mercator(), &ls).unwrap();
        let back = CRS::web_mercator().transform_geometry(&CRS::wgs84(), &merc).unwrap();
        let (Geometry::LineString(a), Geometry::LineString(b)) = (&ls, &back) else {
            panic!("geometry type changed");
        };
        for (p, q) in a.coords().zip(b.coords()) {
            assert!((p.x - q.x).abs() < 1e-9);
            assert!((p.y - q.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unsupported_transform() {
        let err = CRS::from_epsg(32630)
            .transform_coord(&CRS::wgs84(), Coord { x: 0.0, y: 0.0 })
            .unwrap_err();
        assert!(err.to_string().contains("EPSG:32630"));
    }
}
