//! Commands, effects, notices and background messages.

use serde::{Deserialize, Serialize};

use geoview_core::FeatureCollection;

use super::ImportTicket;

/// Geometry kinds a draw interaction can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

/// What a measurement interaction measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    Length,
    Area,
}

impl MeasureKind {
    pub fn geometry_kind(self) -> GeometryKind {
        match self {
            Self::Length => GeometryKind::LineString,
            Self::Area => GeometryKind::Polygon,
        }
    }
}

/// Importable file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportFormat {
    GeoJson,
    Shapefile,
}

impl ImportFormat {
    /// `accept` attribute for the host's file picker.
    pub fn accept(self) -> &'static str {
        match self {
            Self::GeoJson => ".geojson,.json",
            Self::Shapefile => ".zip,.shp",
        }
    }

    pub fn parse_error_message(self) -> &'static str {
        match self {
            Self::GeoJson => "Erreur de lecture du fichier GeoJSON.",
            Self::Shapefile => "Erreur de lecture du fichier SHP.",
        }
    }
}

/// A UI action, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SelectBaseLayer { title: String },
    ToggleLayerSwitcher,
    ZoomIn,
    ZoomOut,
    Resize { width: f64, height: f64 },
    PointerMove { pixel: [f64; 2] },
    MapClick { pixel: [f64; 2] },
    MapDoubleClick { pixel: [f64; 2] },
    Measure { kind: MeasureKind },
    StartDrawing { kind: GeometryKind },
    FinishDrawing,
    UndoLastPoint,
    CancelDrawing,
    ClearDrawing,
    ToggleDataMenu,
    RequestImport { format: ImportFormat },
    ImportFile { format: ImportFormat, bytes: Vec<u8> },
    ExportGeoJson,
    ExportShapefile,
    /// Raw text of the longitude and latitude inputs.
    Search { lon: String, lat: String },
    ClosePopup,
    Print,
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user (the browser host uses an alert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: msg.into(),
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: msg.into(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: msg.into(),
        }
    }
}

/// Which overlay changed, so the host knows what to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Drawing,
    Import,
    Wfs,
}

/// Something the host must do after a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Notice(Notice),
    /// Animate the view; `center` is in view projection coordinates.
    AnimateView {
        center: [f64; 2],
        zoom: f64,
        duration_ms: u64,
    },
    SetZoom { zoom: f64 },
    BaseLayerChanged { title: String },
    LayerSwitcher { expanded: bool },
    MeasurementText { text: String },
    DrawingControls { visible: bool },
    DataMenu { visible: bool },
    InteractionChanged { active: Option<GeometryKind> },
    OverlayChanged { overlay: OverlayKind },
    OpenFilePicker {
        format: ImportFormat,
        accept: String,
    },
    Download {
        filename: String,
        mime: String,
        contents: String,
    },
    /// `coordinate` is in view projection coordinates.
    ShowPopup { coordinate: [f64; 2], html: String },
    HidePopup,
    CursorPosition { text: String },
    Print,
}

impl From<Notice> for Effect {
    fn from(n: Notice) -> Self {
        Effect::Notice(n)
    }
}

/// Messages sent from background work back to the controller.
pub enum AppMessage {
    /// A file import finished decoding (features in EPSG:4326).
    ImportParsed {
        ticket: ImportTicket,
        format: ImportFormat,
        result: Result<FeatureCollection, String>,
    },
}
