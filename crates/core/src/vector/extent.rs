//! Axis-aligned bounding extent.

use geo::CoordsIter;
use geo_types::{Coord, Geometry};
use serde::{Deserialize, Serialize};

/// A bounding rectangle in map coordinates.
///
/// The empty extent has `min > max` on both axes, so a single point yields a
/// valid zero-area extent rather than an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// An extent containing nothing.
    pub fn empty() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY)
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    pub fn extend_coord(&mut self, c: Coord<f64>) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
    }

    pub fn extend_geometry(&mut self, geom: &Geometry<f64>) {
        for c in geom.coords_iter() {
            self.extend_coord(c);
        }
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Centre of the extent, `None` when empty.
    pub fn center(&self) -> Option<Coord<f64>> {
        if self.is_empty() {
            return None;
        }
        Some(Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        })
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, Point};

    #[test]
    fn empty_extent() {
        let e = Extent::empty();
        assert!(e.is_empty());
        assert_eq!(e.center(), None);
        assert_eq!(e.width(), 0.0);
    }

    #[test]
    fn single_point_is_not_empty() {
        let mut e = Extent::empty();
        e.extend_geometry(&Geometry::Point(Point::new(3.0, 4.0)));
        assert!(!e.is_empty());
        assert_eq!(e.width(), 0.0);
        assert_eq!(e.center(), Some(Coord { x: 3.0, y: 4.0 }));
    }

    #[test]
    fn polygon_extent() {
        let mut e = Extent::empty();
        e.extend_geometry(&Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 2.0), (x: 0.0, y: 0.0),
        ]));
        assert_eq!(e, Extent::new(0.0, 0.0, 4.0, 2.0));
        assert_eq!(e.width(), 4.0);
        assert_eq!(e.center(), Some(Coord { x: 2.0, y: 1.0 }));
    }
}
