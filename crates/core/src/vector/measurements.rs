//! Geodesic measurements: length and area on the sphere
//!
//! Inputs must be geographic (EPSG:4326, lon/lat degrees). Length uses the
//! haversine distance on the mean earth radius; area uses the
//! Chamberlain–Duquette spherical polygon formula.

use geo::{ChamberlainDuquetteArea, Haversine, Length};
use geo_types::{Geometry, LineString, Polygon};

/// Geodesic length in metres.
///
/// Polygons report the length of all their rings; points report zero.
pub fn geodesic_length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::LineString(ls) => ls.length::<Haversine>(),
        Geometry::MultiLineString(mls) => mls.0.iter().map(|ls| ls.length::<Haversine>()).sum(),
        Geometry::Line(l) => LineString::from(vec![l.start, l.end]).length::<Haversine>(),
        Geometry::Polygon(p) => ring_lengths(p),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(ring_lengths).sum(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(geodesic_length).sum(),
        _ => 0.0,
    }
}

/// Geodesic area in square metres (unsigned).
pub fn geodesic_area(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(p) => p.chamberlain_duquette_unsigned_area(),
        Geometry::MultiPolygon(mp) => mp.chamberlain_duquette_unsigned_area(),
        Geometry::Rect(r) => r.to_polygon().chamberlain_duquette_unsigned_area(),
        Geometry::Triangle(t) => t.to_polygon().chamberlain_duquette_unsigned_area(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(geodesic_area).sum(),
        _ => 0.0,
    }
}

fn ring_lengths(p: &Polygon<f64>) -> f64 {
    let ext = p.exterior().length::<Haversine>();
    let int: f64 = p.interiors().iter().map(|r| r.length::<Haversine>()).sum();
    ext + int
}
