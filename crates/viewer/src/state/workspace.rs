//! Workspace state: overlay layers and their vector sources.

use std::collections::HashMap;

use geo::Contains;
use geo_types::{Coord, Geometry, LineString, Point, Polygon};

use geoview_core::{Extent, Feature, FeatureCollection, Style};

use super::OverlayKind;

/// Unique identifier for an overlay in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// In-memory features backing an overlay, in view projection coordinates.
#[derive(Debug, Clone, Default)]
pub struct VectorSource {
    features: FeatureCollection,
}

impl VectorSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn clear(&mut self) {
        self.features = FeatureCollection::new();
    }

    /// Clear then add.
    pub fn replace(&mut self, features: FeatureCollection) {
        self.features = features;
    }

    pub fn features(&self) -> &FeatureCollection {
        &self.features
    }

    pub fn extent(&self) -> Extent {
        self.features.extent()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// An overlay layer drawn above the base layers.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub id: LayerId,
    pub title: String,
    pub kind: OverlayKind,
    pub source: VectorSource,
    pub style: Style,
    pub visible: bool,
}

/// The workspace holds every overlay and their display order.
///
/// The import and drawing layers always exist; WFS layers are stacked on
/// top as they are added.
pub struct Workspace {
    import: Overlay,
    draw: Overlay,
    wfs: HashMap<LayerId, Overlay>,
    /// Display order (bottom to top).
    layer_order: Vec<LayerId>,
    next_id: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

fn overlay(id: LayerId, title: &str, kind: OverlayKind, style: Style) -> Overlay {
    Overlay {
        id,
        title: title.to_string(),
        kind,
        source: VectorSource::new(),
        style,
        visible: true,
    }
}

impl Workspace {
    /// A workspace with the import layer below the drawing layer.
    pub fn new() -> Self {
        let import = overlay(LayerId(1), "Imported data", OverlayKind::Import, Style::imported());
        let draw = overlay(LayerId(2), "Drawings", OverlayKind::Drawing, Style::drawing());
        Self {
            layer_order: vec![import.id, draw.id],
            import,
            draw,
            wfs: HashMap::new(),
            next_id: 3,
        }
    }

    /// Add a WFS layer on top of every existing overlay.
    pub fn add_wfs(&mut self, title: &str, features: FeatureCollection, style: Style) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let mut layer = overlay(id, title, OverlayKind::Wfs, style);
        layer.source.replace(features);
        self.wfs.insert(id, layer);
        self.layer_order.push(id);
        id
    }

    pub fn get(&self, id: LayerId) -> Option<&Overlay> {
        if id == self.import.id {
            Some(&self.import)
        } else if id == self.draw.id {
            Some(&self.draw)
        } else {
            self.wfs.get(&id)
        }
    }

    pub fn draw_source(&self) -> &VectorSource {
        &self.draw.source
    }

    pub fn draw_source_mut(&mut self) -> &mut VectorSource {
        &mut self.draw.source
    }

    pub fn import_source(&self) -> &VectorSource {
        &self.import.source
    }

    pub fn import_source_mut(&mut self) -> &mut VectorSource {
        &mut self.import.source
    }

    /// Iterate overlays bottom to top.
    pub fn overlays_ordered(&self) -> impl Iterator<Item = &Overlay> {
        self.layer_order.iter().filter_map(|id| self.get(*id))
    }

    pub fn layer_order(&self) -> &[LayerId] {
        &self.layer_order
    }

    pub fn len(&self) -> usize {
        self.layer_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer_order.is_empty()
    }

    /// Find the topmost visible feature of a `kind` overlay within
    /// `tolerance` map units of `coord`. Later features win within a layer.
    pub fn feature_at(
        &self,
        coord: Coord<f64>,
        tolerance: f64,
        kind: OverlayKind,
    ) -> Option<(LayerId, &Feature)> {
        self.layer_order
            .iter()
            .rev()
            .filter_map(|id| self.get(*id))
            .filter(|o| o.visible && o.kind == kind)
            .find_map(|o| {
                o.source
                    .features()
                    .features
                    .iter()
                    .rev()
                    .find(|f| f.geometry.as_ref().is_some_and(|g| hits(g, coord, tolerance)))
                    .map(|f| (o.id, f))
            })
    }
}

fn hits(geom: &Geometry<f64>, c: Coord<f64>, tol: f64) -> bool {
    match geom {
        Geometry::Point(p) => distance(p.0, c) <= tol,
        Geometry::MultiPoint(mp) => mp.iter().any(|p| distance(p.0, c) <= tol),
        Geometry::Line(l) => segment_distance(c, l.start, l.end) <= tol,
        Geometry::LineString(ls) => line_hits(ls, c, tol),
        Geometry::MultiLineString(mls) => mls.iter().any(|ls| line_hits(ls, c, tol)),
        Geometry::Polygon(poly) => polygon_hits(poly, c, tol),
        Geometry::MultiPolygon(mp) => mp.iter().any(|poly| polygon_hits(poly, c, tol)),
        Geometry::Rect(r) => polygon_hits(&r.to_polygon(), c, tol),
        Geometry::Triangle(t) => polygon_hits(&t.to_polygon(), c, tol),
        Geometry::GeometryCollection(gc) => gc.iter().any(|g| hits(g, c, tol)),
    }
}

fn polygon_hits(poly: &Polygon<f64>, c: Coord<f64>, tol: f64) -> bool {
    poly.contains(&Point(c))
        || line_hits(poly.exterior(), c, tol)
        || poly.interiors().iter().any(|ring| line_hits(ring, c, tol))
}

fn line_hits(ls: &LineString<f64>, c: Coord<f64>, tol: f64) -> bool {
    match ls.0.as_slice() {
        [] => false,
        [only] => distance(*only, c) <= tol,
        coords => coords
            .windows(2)
            .any(|w| segment_distance(c, w[0], w[1]) <= tol),
    }
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    distance(p, Coord { x: a.x + t * dx, y: a.y + t * dy })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, point, polygon};

    fn wfs_features() -> FeatureCollection {
        vec![
            Feature::new(point!(x: 0.0, y: 0.0).into()).with_property("name", "origin"),
            Feature::new(line_string![(x: 10.0, y: 0.0), (x: 20.0, y: 0.0)].into())
                .with_property("name", "road"),
            Feature::new(
                polygon![(x: 30.0, y: 0.0), (x: 40.0, y: 0.0), (x: 40.0, y: 10.0), (x: 30.0, y: 10.0)]
                    .into(),
            )
            .with_property("name", "parcel"),
        ]
        .into()
    }

    fn name(f: &Feature) -> &str {
        f.get_property("name").and_then(|v| v.as_str()).unwrap_or_default()
    }

    #[test]
    fn fixed_layers_exist() {
        let ws = Workspace::new();
        assert_eq!(ws.len(), 2);
        assert!(ws.draw_source().is_empty());
        assert!(ws.import_source().is_empty());
        let kinds: Vec<_> = ws.overlays_ordered().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OverlayKind::Import, OverlayKind::Drawing]);
    }

    #[test]
    fn replace_clears_previous_features() {
        let mut ws = Workspace::new();
        ws.import_source_mut().replace(wfs_features());
        assert_eq!(ws.import_source().len(), 3);
        ws.import_source_mut()
            .replace(vec![Feature::new(point!(x: 1.0, y: 1.0).into())].into());
        assert_eq!(ws.import_source().len(), 1);
    }

    #[test]
    fn hit_test_each_geometry_kind() {
        let mut ws = Workspace::new();
        ws.add_wfs("layer", wfs_features(), Style::default());

        let hit = |x, y| {
            ws.feature_at(Coord { x, y }, 1.0, OverlayKind::Wfs)
                .map(|(_, f)| name(f).to_string())
        };
        assert_eq!(hit(0.5, 0.5).as_deref(), Some("origin"));
        assert_eq!(hit(15.0, 0.8).as_deref(), Some("road"));
        assert_eq!(hit(35.0, 5.0).as_deref(), Some("parcel"));
        assert_eq!(hit(25.0, 5.0), None);
    }

    #[test]
    fn topmost_layer_wins() {
        let mut ws = Workspace::new();
        ws.add_wfs("bottom", wfs_features(), Style::default());
        let top = ws.add_wfs(
            "top",
            vec![Feature::new(point!(x: 0.0, y: 0.0).into()).with_property("name", "top")].into(),
            Style::default(),
        );
        let (id, f) = ws.feature_at(Coord { x: 0.0, y: 0.0 }, 1.0, OverlayKind::Wfs).unwrap();
        assert_eq!(id, top);
        assert_eq!(name(f), "top");
        // Drawn features are not queried for WFS hits.
        ws.draw_source_mut()
            .add_feature(Feature::new(point!(x: 100.0, y: 100.0).into()));
        assert!(ws
            .feature_at(Coord { x: 100.0, y: 100.0 }, 1.0, OverlayKind::Wfs)
            .is_none());
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 10.0, y: 0.0 };
        assert_eq!(segment_distance(Coord { x: 5.0, y: 3.0 }, a, b), 3.0);
        assert_eq!(segment_distance(Coord { x: 13.0, y: 4.0 }, a, b), 5.0);
    }
}
