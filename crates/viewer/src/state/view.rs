//! Map view: centre, zoom and the pixel <-> map coordinate transform.

use geo_types::Coord;

use geoview_core::crs::{from_lon_lat, to_lon_lat};
use geoview_core::{Extent, CRS};

/// Resolution (m/px) of zoom level 0 for 256 px Web Mercator tiles.
pub const ZOOM0_RESOLUTION: f64 = 156_543.033_928_040_97;

/// The map view. `center` is in `projection` coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    center: Coord<f64>,
    zoom: f64,
    projection: CRS,
    min_zoom: f64,
    max_zoom: f64,
    /// Viewport `[width, height]` in pixels.
    viewport: [f64; 2],
}

impl MapView {
    /// Create a view centred on `center_lon_lat` (degrees).
    pub fn new(center_lon_lat: [f64; 2], zoom: f64, zoom_range: (f64, f64), viewport: [f64; 2]) -> Self {
        let (min_zoom, max_zoom) = zoom_range;
        Self {
            center: from_lon_lat(center_lon_lat[0], center_lon_lat[1]),
            zoom: zoom.clamp(min_zoom, max_zoom),
            projection: CRS::web_mercator(),
            min_zoom,
            max_zoom,
            viewport,
        }
    }

    pub fn center(&self) -> Coord<f64> {
        self.center
    }

    /// View centre as `(lon, lat)` degrees.
    pub fn center_lon_lat(&self) -> (f64, f64) {
        let c = to_lon_lat(self.center.x, self.center.y);
        (c.x, c.y)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn projection(&self) -> &CRS {
        &self.projection
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn viewport(&self) -> [f64; 2] {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.viewport = [width, height];
        }
    }

    /// Map units per pixel at the current zoom.
    pub fn resolution(&self) -> f64 {
        resolution_for_zoom(self.zoom)
    }

    /// Ground metres per pixel at the view centre.
    pub fn point_resolution(&self) -> f64 {
        let (_, lat) = self.center_lon_lat();
        self.resolution() * lat.to_radians().cos()
    }

    /// Set the zoom; out-of-range values leave the view untouched.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() || zoom < self.min_zoom || zoom > self.max_zoom {
            return false;
        }
        self.zoom = zoom;
        true
    }

    pub fn zoom_by(&mut self, delta: f64) -> bool {
        self.set_zoom(self.zoom + delta)
    }

    pub fn set_center(&mut self, center: Coord<f64>) {
        if center.x.is_finite() && center.y.is_finite() {
            self.center = center;
        }
    }

    /// Jump to an animation target. The zoom is clamped to the allowed range.
    pub fn animate_to(&mut self, center: Coord<f64>, zoom: f64) {
        self.set_center(center);
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Convert a viewport pixel (origin top-left, y down) to map coordinates.
    pub fn coordinate_from_pixel(&self, pixel: [f64; 2]) -> Coord<f64> {
        let res = self.resolution();
        let [w, h] = self.viewport;
        Coord {
            x: self.center.x + (pixel[0] - w / 2.0) * res,
            y: self.center.y - (pixel[1] - h / 2.0) * res,
        }
    }

    pub fn pixel_from_coordinate(&self, coord: Coord<f64>) -> [f64; 2] {
        let res = self.resolution();
        let [w, h] = self.viewport;
        [
            w / 2.0 + (coord.x - self.center.x) / res,
            h / 2.0 - (coord.y - self.center.y) / res,
        ]
    }

    /// Compute the centre and zoom that show `extent` inside the viewport
    /// minus `padding` (`[top, right, bottom, left]` pixels).
    ///
    /// Returns `None` for an empty extent. A degenerate (single point)
    /// extent fits at the maximum zoom.
    pub fn fit(&self, extent: &Extent, padding: [f64; 4]) -> Option<(Coord<f64>, f64)> {
        let ext_center = extent.center()?;
        let [top, right, bottom, left] = padding;
        let [w, h] = self.viewport;
        let avail_w = (w - left - right).max(1.0);
        let avail_h = (h - top - bottom).max(1.0);

        let needed = (extent.width() / avail_w).max(extent.height() / avail_h);
        let zoom = if needed > 0.0 {
            zoom_for_resolution(needed).clamp(self.min_zoom, self.max_zoom)
        } else {
            self.max_zoom
        };

        // Shift so the extent centre lands in the middle of the padded area.
        let res = resolution_for_zoom(zoom);
        let center = Coord {
            x: ext_center.x - (left - right) / 2.0 * res,
            y: ext_center.y + (top - bottom) / 2.0 * res,
        };
        Some((center, zoom))
    }
}

pub fn resolution_for_zoom(zoom: f64) -> f64 {
    ZOOM0_RESOLUTION / 2f64.powf(zoom)
}

pub fn zoom_for_resolution(resolution: f64) -> f64 {
    (ZOOM0_RESOLUTION / resolution).log2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn view() -> MapView {
        MapView::new([0.0, 0.0], 2.0, (0.0, 28.0), [800.0, 600.0])
    }

    #[test]
    fn zoom_outside_range_is_noop() {
        let mut v = MapView::new([0.0, 0.0], 28.0, (0.0, 28.0), [800.0, 600.0]);
        assert!(!v.zoom_by(1.0));
        assert_eq!(v.zoom(), 28.0);
        assert!(v.zoom_by(-1.0));
        assert_eq!(v.zoom(), 27.0);
        assert!(!v.set_zoom(f64::NAN));
    }

    #[test]
    fn pixel_round_trip() {
        let v = view();
        let c = v.coordinate_from_pixel([400.0, 300.0]);
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-9);

        let c = v.coordinate_from_pixel([500.0, 200.0]);
        assert!(c.x > 0.0 && c.y > 0.0);
        let p = v.pixel_from_coordinate(c);
        assert_relative_eq!(p[0], 500.0, epsilon = 1e-6);
        assert_relative_eq!(p[1], 200.0, epsilon = 1e-6);
    }

    #[test]
    fn fit_shows_whole_extent() {
        let v = view();
        let ext = Extent::new(-100_000.0, -50_000.0, 100_000.0, 50_000.0);
        let (center, zoom) = v.fit(&ext, [20.0; 4]).unwrap();
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-6);
        // 200 km across 760 px
        assert_relative_eq!(resolution_for_zoom(zoom), 200_000.0 / 760.0, epsilon = 1e-6);
    }

    #[test]
    fn fit_point_uses_max_zoom() {
        let v = view();
        let ext = Extent::new(10.0, 10.0, 10.0, 10.0);
        let (center, zoom) = v.fit(&ext, [0.0; 4]).unwrap();
        assert_eq!(zoom, 28.0);
        assert_eq!(center, Coord { x: 10.0, y: 10.0 });
        assert!(v.fit(&Extent::empty(), [0.0; 4]).is_none());
    }

    #[test]
    fn point_resolution_shrinks_with_latitude() {
        let eq = MapView::new([0.0, 0.0], 10.0, (0.0, 28.0), [800.0, 600.0]);
        let north = MapView::new([0.0, 60.0], 10.0, (0.0, 28.0), [800.0, 600.0]);
        assert_relative_eq!(north.point_resolution(), eq.point_resolution() * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn center_lon_lat_inverts_projection() {
        let v = MapView::new([-7.6, 33.6], 6.0, (0.0, 28.0), [800.0, 600.0]);
        let (lon, lat) = v.center_lon_lat();
        assert_relative_eq!(lon, -7.6, epsilon = 1e-9);
        assert_relative_eq!(lat, 33.6, epsilon = 1e-9);
    }
}
