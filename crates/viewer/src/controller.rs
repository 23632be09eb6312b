//! Map controller: owns the application state and turns commands into effects.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use geo_types::{Coord, Geometry};
use tracing::{debug, info, warn};

use geoview_core::vector::{geodesic_area, geodesic_length};
use geoview_core::{Feature, FeatureCollection, Style, CRS};

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::format::{format_area, format_length, parse_coordinate_input};
use crate::io;
use crate::panels::{LayerSwitcher, MousePosition, PopupTable, ScaleBar};
use crate::state::{
    AppMessage, BaseLayers, Command, DrawInteraction, DrawProgress, DrawPurpose, Effect,
    GeometryKind, ImportFormat, ImportTicket, ImportTracker, InteractionSlot, LayerId, MapView,
    MeasureKind, Notice, OverlayKind, Workspace,
};

pub const MSG_NO_GEOMETRY: &str = "Fichier chargé, mais aucune géométrie visible.";
pub const MSG_NOTHING_TO_EXPORT: &str = "Aucune entité à exporter.";
pub const MSG_SHAPEFILE_EXPORT: &str =
    "Export SHP non encore implémenté. Utiliser GeoJSON pour l'instant.";
pub const MSG_INVALID_COORDINATES: &str = "Veuillez entrer des coordonnées valides.";

/// Duration of the double-click zoom animation.
const DOUBLE_CLICK_ZOOM_MS: u64 = 250;

/// One entry of the render stack, bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderLayer {
    Base { title: String, visible: bool },
    Overlay { id: LayerId, title: String, kind: OverlayKind },
}

/// A popup currently open on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPopup {
    pub coordinate: Coord<f64>,
    pub html: String,
}

/// The map viewer.
pub struct MapController {
    config: ViewerConfig,
    view: MapView,
    base_layers: BaseLayers,
    layer_switcher: LayerSwitcher,
    workspace: Workspace,
    interaction: InteractionSlot,
    imports: ImportTracker,
    mouse_position: MousePosition,
    measurement_text: Option<String>,
    drawing_controls_visible: bool,
    data_menu_visible: bool,
    popup: Option<OpenPopup>,

    /// Message channels for background work.
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
}

impl MapController {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let base_layers = BaseLayers::from_config(&config.base_layers)
            .ok_or_else(|| ViewerError::Config("at least one base layer is required".into()))?;
        let view = MapView::new(
            config.center,
            config.zoom,
            (config.min_zoom, config.max_zoom),
            config.viewport,
        );
        let (tx, rx) = crossbeam_channel::unbounded();

        info!(
            "map viewer started: {} base layers, zoom {}",
            base_layers.len(),
            view.zoom()
        );

        Ok(Self {
            layer_switcher: LayerSwitcher::new(config.layer_switcher_label.clone()),
            config,
            view,
            base_layers,
            workspace: Workspace::new(),
            interaction: InteractionSlot::new(),
            imports: ImportTracker::new(),
            mouse_position: MousePosition::default(),
            measurement_text: None,
            drawing_controls_visible: false,
            data_menu_visible: false,
            popup: None,
            tx,
            rx,
        })
    }

    /// Apply one UI command and return what the host must do.
    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        debug!("dispatch {:?}", CommandName(&command));
        match command {
            Command::SelectBaseLayer { title } => self.select_base_layer(&title),
            Command::ToggleLayerSwitcher => vec![Effect::LayerSwitcher {
                expanded: self.layer_switcher.toggle(),
            }],
            Command::ZoomIn => self.zoom_by(1.0),
            Command::ZoomOut => self.zoom_by(-1.0),
            Command::Resize { width, height } => {
                self.view.set_viewport(width, height);
                Vec::new()
            }
            Command::PointerMove { pixel } => {
                let coord = self.view.coordinate_from_pixel(pixel);
                match self.mouse_position.update(coord, self.view.projection()) {
                    Some(text) => vec![Effect::CursorPosition {
                        text: text.to_string(),
                    }],
                    None => Vec::new(),
                }
            }
            Command::MapClick { pixel } => self.map_click(pixel),
            Command::MapDoubleClick { pixel } => self.map_double_click(pixel),
            Command::Measure { kind } => self.start_measure(kind),
            Command::StartDrawing { kind } => self.start_drawing(kind),
            Command::FinishDrawing => match self.interaction.get_mut().and_then(|d| d.finish()) {
                Some(geom) => self.complete_interaction(geom),
                None => Vec::new(),
            },
            Command::UndoLastPoint => {
                if let Some(d) = self.interaction.get_mut() {
                    d.remove_last_point();
                }
                Vec::new()
            }
            Command::CancelDrawing => {
                let mut effects = self.remove_interaction();
                effects.extend(self.set_drawing_controls(false));
                effects
            }
            Command::ClearDrawing => {
                self.workspace.draw_source_mut().clear();
                let mut effects = vec![Effect::OverlayChanged {
                    overlay: OverlayKind::Drawing,
                }];
                effects.extend(self.remove_interaction());
                effects.extend(self.set_drawing_controls(false));
                effects
            }
            Command::ToggleDataMenu => {
                self.data_menu_visible = !self.data_menu_visible;
                vec![Effect::DataMenu {
                    visible: self.data_menu_visible,
                }]
            }
            Command::RequestImport { format } => vec![Effect::OpenFilePicker {
                format,
                accept: format.accept().to_string(),
            }],
            Command::ImportFile { format, bytes } => self.import_file(format, bytes),
            Command::ExportGeoJson => self.export_geojson(),
            Command::ExportShapefile => vec![Notice::warning(MSG_SHAPEFILE_EXPORT).into()],
            Command::Search { lon, lat } => self.search(&lon, &lat),
            Command::ClosePopup => self.close_popup(),
            Command::Print => vec![Effect::Print],
        }
    }

    /// Drain results of background work.
    pub fn process_messages(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            effects.extend(self.handle_message(msg));
        }
        effects
    }

    /// Block up to `timeout` for the next background result, then drain
    /// anything else already queued.
    pub fn wait_messages(&mut self, timeout: Duration) -> Vec<Effect> {
        let mut effects = match self.rx.recv_timeout(timeout) {
            Ok(msg) => self.handle_message(msg),
            Err(_) => return Vec::new(),
        };
        effects.extend(self.process_messages());
        effects
    }

    fn handle_message(&mut self, msg: AppMessage) -> Vec<Effect> {
        match msg {
            AppMessage::ImportParsed {
                ticket,
                format,
                result,
            } => self.apply_import(ticket, format, result),
        }
    }

    /// Register a WFS layer whose features are in EPSG:4326.
    pub fn add_wfs_layer(
        &mut self,
        title: &str,
        features: FeatureCollection,
        style: Style,
    ) -> Result<LayerId> {
        let projected = features.transformed(&CRS::wgs84(), self.view.projection())?;
        let count = projected.len();
        let id = self.workspace.add_wfs(title, projected, style);
        info!("WFS layer '{}' added with {} features", title, count);
        Ok(id)
    }

    /// Layers bottom to top: base layers, then overlays.
    pub fn render_order(&self) -> Vec<RenderLayer> {
        let base = self.base_layers.iter().map(|(s, visible)| RenderLayer::Base {
            title: s.title.clone(),
            visible,
        });
        let overlays = self.workspace.overlays_ordered().map(|o| RenderLayer::Overlay {
            id: o.id,
            title: o.title.clone(),
            kind: o.kind,
        });
        base.chain(overlays).collect()
    }

    /// Scale line for the current view.
    pub fn scale_bar(&self) -> Option<ScaleBar> {
        ScaleBar::compute(self.view.point_resolution(), self.config.scale_bar_min_width_px)
    }

    /// Features of an overlay converted to EPSG:4326.
    pub fn overlay_features(&self, kind: OverlayKind) -> Result<FeatureCollection> {
        let source = match kind {
            OverlayKind::Drawing => self.workspace.draw_source().features().clone(),
            OverlayKind::Import => self.workspace.import_source().features().clone(),
            OverlayKind::Wfs => self
                .workspace
                .overlays_ordered()
                .filter(|o| o.kind == OverlayKind::Wfs)
                .flat_map(|o| o.source.features().iter().cloned())
                .collect(),
        };
        Ok(source.transformed(self.view.projection(), &CRS::wgs84())?)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn base_layers(&self) -> &BaseLayers {
        &self.base_layers
    }

    pub fn layer_switcher(&self) -> &LayerSwitcher {
        &self.layer_switcher
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn interaction(&self) -> Option<&DrawInteraction> {
        self.interaction.get()
    }

    /// Number of draw interactions registered on the map (0 or 1).
    pub fn interaction_count(&self) -> usize {
        self.interaction.count()
    }

    pub fn measurement_text(&self) -> Option<&str> {
        self.measurement_text.as_deref()
    }

    pub fn cursor_text(&self) -> Option<&str> {
        self.mouse_position.text()
    }

    pub fn drawing_controls_visible(&self) -> bool {
        self.drawing_controls_visible
    }

    pub fn data_menu_visible(&self) -> bool {
        self.data_menu_visible
    }

    pub fn popup(&self) -> Option<&OpenPopup> {
        self.popup.as_ref()
    }

    fn select_base_layer(&mut self, title: &str) -> Vec<Effect> {
        if self.base_layers.select(title) {
            info!("base layer: {}", title);
            vec![Effect::BaseLayerChanged {
                title: title.to_string(),
            }]
        } else {
            warn!("unknown base layer '{}'", title);
            vec![Notice::warning(format!("Fond de carte inconnu : {title}")).into()]
        }
    }

    fn zoom_by(&mut self, delta: f64) -> Vec<Effect> {
        if self.view.zoom_by(delta) {
            vec![Effect::SetZoom {
                zoom: self.view.zoom(),
            }]
        } else {
            debug!("zoom {} + {} outside range", self.view.zoom(), delta);
            Vec::new()
        }
    }

    fn animate(&mut self, center: Coord<f64>, zoom: f64, duration_ms: u64) -> Effect {
        self.view.animate_to(center, zoom);
        let c = self.view.center();
        Effect::AnimateView {
            center: [c.x, c.y],
            zoom: self.view.zoom(),
            duration_ms,
        }
    }

    fn map_click(&mut self, pixel: [f64; 2]) -> Vec<Effect> {
        let coord = self.view.coordinate_from_pixel(pixel);
        let snap = self.config.snap_tolerance_px * self.view.resolution();
        if let Some(draw) = self.interaction.get_mut() {
            return match draw.click(coord, snap) {
                DrawProgress::Complete(geom) => self.complete_interaction(geom),
                DrawProgress::Continue => Vec::new(),
            };
        }

        let tolerance = self.config.hit_tolerance_px * self.view.resolution();
        let hit = self
            .workspace
            .feature_at(coord, tolerance, OverlayKind::Wfs)
            .map(|(_, f)| PopupTable::from_properties(&f.properties).to_html());
        match hit {
            Some(html) => self.open_popup(coord, html),
            None => self.close_popup(),
        }
    }

    fn map_double_click(&mut self, pixel: [f64; 2]) -> Vec<Effect> {
        if let Some(draw) = self.interaction.get_mut() {
            return match draw.finish() {
                Some(geom) => self.complete_interaction(geom),
                None => Vec::new(),
            };
        }
        // Zoom in one level keeping the clicked point under the cursor.
        let target_zoom = self.view.zoom() + 1.0;
        if target_zoom > self.view.zoom_range().1 {
            return Vec::new();
        }
        let anchor = self.view.coordinate_from_pixel(pixel);
        let c = self.view.center();
        let center = Coord {
            x: anchor.x + (c.x - anchor.x) / 2.0,
            y: anchor.y + (c.y - anchor.y) / 2.0,
        };
        vec![self.animate(center, target_zoom, DOUBLE_CLICK_ZOOM_MS)]
    }

    fn open_popup(&mut self, coordinate: Coord<f64>, html: String) -> Vec<Effect> {
        let effect = Effect::ShowPopup {
            coordinate: [coordinate.x, coordinate.y],
            html: html.clone(),
        };
        self.popup = Some(OpenPopup { coordinate, html });
        vec![effect]
    }

    fn close_popup(&mut self) -> Vec<Effect> {
        match self.popup.take() {
            Some(_) => vec![Effect::HidePopup],
            None => Vec::new(),
        }
    }

    fn start_measure(&mut self, kind: MeasureKind) -> Vec<Effect> {
        let prompt = match kind {
            MeasureKind::Length => "Cliquez pour tracer une ligne\u{2026}",
            MeasureKind::Area => "Cliquez pour dessiner un polygone\u{2026}",
        };
        self.measurement_text = Some(prompt.to_string());
        let mut effects = vec![Effect::MeasurementText {
            text: prompt.to_string(),
        }];
        effects.extend(self.install(DrawInteraction::measure(kind)));
        // A measurement replaces any sketch, so its controls go away.
        effects.extend(self.set_drawing_controls(false));
        effects
    }

    fn start_drawing(&mut self, kind: GeometryKind) -> Vec<Effect> {
        let mut effects = self.install(DrawInteraction::sketch(kind));
        effects.extend(self.set_drawing_controls(true));
        effects
    }

    fn install(&mut self, interaction: DrawInteraction) -> Vec<Effect> {
        let kind = interaction.kind();
        if let Some(old) = self.interaction.replace(interaction) {
            debug!("replaced {:?} interaction", old.purpose());
        }
        vec![Effect::InteractionChanged { active: Some(kind) }]
    }

    fn remove_interaction(&mut self) -> Vec<Effect> {
        match self.interaction.clear() {
            Some(_) => vec![Effect::InteractionChanged { active: None }],
            None => Vec::new(),
        }
    }

    fn set_drawing_controls(&mut self, visible: bool) -> Vec<Effect> {
        if self.drawing_controls_visible == visible {
            return Vec::new();
        }
        self.drawing_controls_visible = visible;
        vec![Effect::DrawingControls { visible }]
    }

    /// A sketch finished: measure it or store it, then tear the interaction down.
    fn complete_interaction(&mut self, geom: Geometry<f64>) -> Vec<Effect> {
        let Some(draw) = self.interaction.clear() else {
            return Vec::new();
        };
        let mut effects: Vec<Effect> = Vec::new();
        match draw.purpose() {
            DrawPurpose::Measure(kind) => {
                match self.view.projection().transform_geometry(&CRS::wgs84(), &geom) {
                    Ok(geographic) => {
                        let text = match kind {
                            MeasureKind::Length => {
                                format!("Distance : {}", format_length(geodesic_length(&geographic)))
                            }
                            MeasureKind::Area => {
                                format!("Surface : {}", format_area(geodesic_area(&geographic)))
                            }
                        };
                        info!("measurement: {}", text);
                        self.measurement_text = Some(text.clone());
                        effects.push(Effect::MeasurementText { text });
                    }
                    Err(e) => {
                        warn!("measurement failed: {}", e);
                        effects.push(Notice::error(format!("Échec de la mesure : {e}")).into());
                    }
                }
            }
            DrawPurpose::Sketch => {
                self.workspace.draw_source_mut().add_feature(Feature::new(geom));
                effects.push(Effect::OverlayChanged {
                    overlay: OverlayKind::Drawing,
                });
                effects.extend(self.set_drawing_controls(false));
            }
        }
        effects.push(Effect::InteractionChanged { active: None });
        effects
    }

    fn import_file(&mut self, format: ImportFormat, bytes: Vec<u8>) -> Vec<Effect> {
        let ticket = self.imports.begin();
        info!("import {:?} ({} bytes), ticket {}", format, bytes.len(), ticket.0);
        match format {
            ImportFormat::GeoJson => {
                let result = io::parse_import(format, &bytes).map_err(|e| e.to_string());
                self.apply_import(ticket, format, result)
            }
            ImportFormat::Shapefile => {
                io::spawn_parse(ticket, format, bytes, self.tx.clone());
                Vec::new()
            }
        }
    }

    /// Replace the import layer with decoded features and fit the view.
    fn apply_import(
        &mut self,
        ticket: ImportTicket,
        format: ImportFormat,
        result: std::result::Result<FeatureCollection, String>,
    ) -> Vec<Effect> {
        if !self.imports.is_current(ticket) {
            debug!("discarding stale import result, ticket {}", ticket.0);
            return Vec::new();
        }

        let projected = result.and_then(|fc| {
            fc.transformed(&CRS::wgs84(), self.view.projection())
                .map_err(|e| e.to_string())
        });
        let features = match projected {
            Ok(fc) => fc,
            Err(e) => {
                warn!("import {:?} failed: {}", format, e);
                return vec![Notice::error(format.parse_error_message()).into()];
            }
        };

        info!("imported {} features", features.len());
        self.workspace.import_source_mut().replace(features);
        let mut effects = vec![Effect::OverlayChanged {
            overlay: OverlayKind::Import,
        }];

        let extent = self.workspace.import_source().extent();
        match self.view.fit(&extent, self.config.fit_padding) {
            Some((center, zoom)) => {
                effects.push(self.animate(center, zoom, self.config.fit_duration_ms));
            }
            None => effects.push(Notice::warning(MSG_NO_GEOMETRY).into()),
        }
        effects
    }

    fn export_geojson(&self) -> Vec<Effect> {
        let features = self.workspace.draw_source().features();
        if features.is_empty() {
            return vec![Notice::info(MSG_NOTHING_TO_EXPORT).into()];
        }
        match io::export_geojson(features, self.view.projection()) {
            Ok(contents) => {
                info!("exporting {} features", features.len());
                vec![Effect::Download {
                    filename: self.config.export_filename.clone(),
                    mime: "application/json".to_string(),
                    contents,
                }]
            }
            Err(e) => {
                warn!("export failed: {}", e);
                vec![Notice::error(format!("Échec de l'export : {e}")).into()]
            }
        }
    }

    fn search(&mut self, lon: &str, lat: &str) -> Vec<Effect> {
        let Some((lon, lat)) = parse_coordinate_input(lon, lat) else {
            return vec![Notice::error(MSG_INVALID_COORDINATES).into()];
        };
        let center = match CRS::wgs84().transform_coord(self.view.projection(), Coord { x: lon, y: lat }) {
            Ok(c) => c,
            Err(e) => {
                warn!("search: {}", e);
                return vec![Notice::error(MSG_INVALID_COORDINATES).into()];
            }
        };
        let mut effects = vec![self.animate(
            center,
            self.config.search_zoom,
            self.config.animation_duration_ms,
        )];
        let html = format!("Coordonnées :<br>Lat: {:.5}<br>Lng: {:.5}", lat, lon);
        effects.extend(self.open_popup(center, html));
        effects
    }
}

/// Logs a command without dumping file contents.
struct CommandName<'a>(&'a Command);

impl std::fmt::Debug for CommandName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Command::ImportFile { format, bytes } => {
                write!(f, "ImportFile {{ format: {:?}, {} bytes }}", format, bytes.len())
            }
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> MapController {
        MapController::new(ViewerConfig::default()).unwrap()
    }

    #[test]
    fn starts_at_configured_view() {
        let c = controller();
        let (lon, lat) = c.view().center_lon_lat();
        assert!((lon + 7.6).abs() < 1e-9 && (lat - 33.6).abs() < 1e-9);
        assert_eq!(c.view().zoom(), 6.0);
        assert_eq!(c.interaction_count(), 0);
        assert!(!c.layer_switcher().is_expanded());
    }

    #[test]
    fn render_order_puts_base_layers_first() {
        let mut c = controller();
        c.add_wfs_layer("parcels", FeatureCollection::new(), Style::default())
            .unwrap();
        let order = c.render_order();
        assert_eq!(order.len(), 6);
        assert!(order[..3].iter().all(|l| matches!(l, RenderLayer::Base { .. })));
        assert!(matches!(
            &order[5],
            RenderLayer::Overlay { kind: OverlayKind::Wfs, title, .. } if title == "parcels"
        ));
    }

    #[test]
    fn unknown_base_layer_warns() {
        let mut c = controller();
        let effects = c.dispatch(Command::SelectBaseLayer {
            title: "Nope".into(),
        });
        assert!(matches!(&effects[..], [Effect::Notice(n)] if n.level == crate::NoticeLevel::Warning));
        assert!(c.base_layers().is_visible("OpenStreetMap"));
    }

    #[test]
    fn measure_prompt_and_replacement() {
        let mut c = controller();
        c.dispatch(Command::StartDrawing {
            kind: GeometryKind::Polygon,
        });
        assert!(c.drawing_controls_visible());
        let effects = c.dispatch(Command::Measure {
            kind: MeasureKind::Length,
        });
        assert_eq!(c.measurement_text(), Some("Cliquez pour tracer une ligne…"));
        assert!(effects.contains(&Effect::DrawingControls { visible: false }));
        assert_eq!(c.interaction_count(), 1);
        assert_eq!(
            c.interaction().map(|d| d.purpose()),
            Some(DrawPurpose::Measure(MeasureKind::Length))
        );
    }

    #[test]
    fn toggles_flip_state() {
        let mut c = controller();
        assert_eq!(
            c.dispatch(Command::ToggleDataMenu),
            vec![Effect::DataMenu { visible: true }]
        );
        assert_eq!(
            c.dispatch(Command::ToggleLayerSwitcher),
            vec![Effect::LayerSwitcher { expanded: true }]
        );
        assert_eq!(c.dispatch(Command::Print), vec![Effect::Print]);
    }

    #[test]
    fn command_debug_hides_bytes() {
        let cmd = Command::ImportFile {
            format: ImportFormat::GeoJson,
            bytes: vec![0; 1024],
        };
        assert_eq!(
            format!("{:?}", CommandName(&cmd)),
            "ImportFile { format: GeoJson, 1024 bytes }"
        );
    }
}
