//! Cursor coordinate readout.

use geo_types::Coord;

use geoview_core::CRS;

use crate::format::format_coordinate;

/// Tracks the last cursor position, shown as `"lat, lon"` in EPSG:4326.
#[derive(Debug, Clone, Default)]
pub struct MousePosition {
    text: Option<String>,
}

impl MousePosition {
    /// Update from a map coordinate in `projection`. Returns the new text.
    pub fn update(&mut self, coord: Coord<f64>, projection: &CRS) -> Option<&str> {
        match projection.transform_coord(&CRS::wgs84(), coord) {
            Ok(ll) => self.text = Some(format_coordinate(ll.x, ll.y)),
            Err(e) => {
                tracing::debug!("mouse position: {}", e);
                self.text = None;
            }
        }
        self.text.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoview_core::crs::from_lon_lat;

    #[test]
    fn shows_lat_then_lon() {
        let mut mp = MousePosition::default();
        assert!(mp.text().is_none());
        let text = mp.update(from_lon_lat(-7.6, 33.6), &CRS::web_mercator()).map(str::to_string);
        assert_eq!(text.as_deref(), Some("33.600000, -7.600000"));
    }

    #[test]
    fn unsupported_projection_clears_text() {
        let mut mp = MousePosition::default();
        mp.update(Coord { x: 1.0, y: 2.0 }, &CRS::wgs84());
        assert_eq!(mp.text(), Some("2.000000, 1.000000"));
        mp.update(Coord { x: 1.0, y: 2.0 }, &CRS::from_epsg(32630));
        assert!(mp.text().is_none());
    }
}
