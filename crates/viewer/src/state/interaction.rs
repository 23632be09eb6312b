//! Draw interactions: turning clicks into point, line and polygon geometries.

use geo_types::{Coord, Geometry, LineString, Point, Polygon};
use geoview_core::Style;

use super::{GeometryKind, MeasureKind};

/// Why an interaction is collecting vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPurpose {
    /// Single-shot measurement; the sketch is discarded afterwards.
    Measure(MeasureKind),
    /// Freehand drawing into the persistent draw layer.
    Sketch,
}

/// Result of feeding a click to an interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawProgress {
    /// More vertices are expected.
    Continue,
    /// The sketch is complete.
    Complete(Geometry<f64>),
}

/// An in-progress sketch in view projection coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInteraction {
    kind: GeometryKind,
    purpose: DrawPurpose,
    vertices: Vec<Coord<f64>>,
}

impl DrawInteraction {
    pub fn new(kind: GeometryKind, purpose: DrawPurpose) -> Self {
        Self {
            kind,
            purpose,
            vertices: Vec::new(),
        }
    }

    pub fn measure(kind: MeasureKind) -> Self {
        Self::new(kind.geometry_kind(), DrawPurpose::Measure(kind))
    }

    pub fn sketch(kind: GeometryKind) -> Self {
        Self::new(kind, DrawPurpose::Sketch)
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn purpose(&self) -> DrawPurpose {
        self.purpose
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }

    /// Style for the in-progress sketch: blue while measuring, the drawing
    /// layer's yellow otherwise.
    pub fn sketch_style(&self) -> Style {
        match self.purpose {
            DrawPurpose::Measure(_) => Style::measurement(),
            DrawPurpose::Sketch => Style::drawing(),
        }
    }

    /// Minimum number of vertices for a valid geometry of this kind.
    pub fn min_vertices(&self) -> usize {
        match self.kind {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
        }
    }

    pub fn can_finish(&self) -> bool {
        self.vertices.len() >= self.min_vertices()
    }

    /// Handle a click at `coord`. A click within `snap_tolerance` of the
    /// first polygon vertex, or of the last line vertex, closes the sketch
    /// instead of adding a vertex.
    pub fn click(&mut self, coord: Coord<f64>, snap_tolerance: f64) -> DrawProgress {
        if self.can_finish() && self.kind != GeometryKind::Point {
            let anchor = match self.kind {
                GeometryKind::Polygon => self.vertices.first(),
                _ => self.vertices.last(),
            };
            if let Some(a) = anchor {
                if (a.x - coord.x).hypot(a.y - coord.y) <= snap_tolerance {
                    return self.finish().map_or(DrawProgress::Continue, DrawProgress::Complete);
                }
            }
        }
        self.add_vertex(coord)
    }

    /// Append a vertex. Points complete immediately.
    pub fn add_vertex(&mut self, coord: Coord<f64>) -> DrawProgress {
        self.vertices.push(coord);
        if self.kind == GeometryKind::Point {
            return self.finish().map_or(DrawProgress::Continue, DrawProgress::Complete);
        }
        DrawProgress::Continue
    }

    /// Drop the most recent vertex. Returns `false` when there was none.
    pub fn remove_last_point(&mut self) -> bool {
        self.vertices.pop().is_some()
    }

    /// Complete the sketch if it has enough vertices, consuming them.
    pub fn finish(&mut self) -> Option<Geometry<f64>> {
        if !self.can_finish() {
            return None;
        }
        let vertices = std::mem::take(&mut self.vertices);
        Some(match self.kind {
            GeometryKind::Point => Geometry::Point(Point(vertices[0])),
            GeometryKind::LineString => Geometry::LineString(LineString::new(vertices)),
            // Polygon::new closes the ring.
            GeometryKind::Polygon => Geometry::Polygon(Polygon::new(LineString::new(vertices), vec![])),
        })
    }
}

/// Holds the single interaction registered on the map.
#[derive(Debug, Default)]
pub struct InteractionSlot {
    active: Option<DrawInteraction>,
}

impl InteractionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `interaction`, returning the one it replaced.
    pub fn replace(&mut self, interaction: DrawInteraction) -> Option<DrawInteraction> {
        self.active.replace(interaction)
    }

    pub fn clear(&mut self) -> Option<DrawInteraction> {
        self.active.take()
    }

    pub fn get(&self) -> Option<&DrawInteraction> {
        self.active.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut DrawInteraction> {
        self.active.as_mut()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Number of registered interactions (0 or 1).
    pub fn count(&self) -> usize {
        usize::from(self.active.is_some())
    }
}
