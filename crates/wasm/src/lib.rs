//! WebAssembly bindings for the GeoView map viewer.
//!
//! The browser page forwards UI events as JSON commands to
//! [`WasmViewer::dispatch`] and performs the JSON effects it gets back
//! (alerts, view animations, downloads, popups). Feature data crosses the
//! boundary as GeoJSON strings in EPSG:4326.

use serde_json::json;
use wasm_bindgen::prelude::*;

use geoview_core::io::{read_geojson_str, write_geojson};
use geoview_core::Style;
use geoview_remote::WfsClient;
use geoview_viewer::state::OverlayKind;
use geoview_viewer::{Command, Effect, ImportFormat, MapController, ViewerConfig};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_config(config_json: &str) -> Result<ViewerConfig, String> {
    if config_json.trim().is_empty() {
        return Ok(ViewerConfig::default());
    }
    ViewerConfig::from_json(config_json).map_err(|e| e.to_string())
}

fn parse_format(format: &str) -> Result<ImportFormat, String> {
    match format.to_ascii_lowercase().as_str() {
        "geojson" | "json" => Ok(ImportFormat::GeoJson),
        "shapefile" | "shp" | "zip" => Ok(ImportFormat::Shapefile),
        other => Err(format!("unknown import format '{other}'")),
    }
}

fn parse_overlay(layer: &str) -> Result<OverlayKind, String> {
    match layer.to_ascii_lowercase().as_str() {
        "drawing" | "draw" => Ok(OverlayKind::Drawing),
        "import" => Ok(OverlayKind::Import),
        "wfs" => Ok(OverlayKind::Wfs),
        other => Err(format!("unknown overlay '{other}'")),
    }
}

fn parse_style(style_json: Option<&str>) -> Result<Option<Style>, String> {
    match style_json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => serde_json::from_str(text).map(Some).map_err(|e| e.to_string()),
        None => Ok(None),
    }
}

fn effects_json(effects: &[Effect]) -> Result<String, String> {
    serde_json::to_string(effects).map_err(|e| e.to_string())
}

/// A map viewer instance owned by the page.
#[wasm_bindgen]
pub struct WasmViewer {
    inner: MapController,
}

#[wasm_bindgen]
impl WasmViewer {
    /// Create a viewer. `config_json` may be empty or a partial config.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmViewer, JsValue> {
        let config = parse_config(config_json).map_err(js_err)?;
        let inner = MapController::new(config).map_err(js_err)?;
        Ok(Self { inner })
    }

    /// Apply a JSON command, e.g. `{"type":"zoom_in"}`, and return the
    /// resulting effects as a JSON array.
    pub fn dispatch(&mut self, command_json: &str) -> Result<String, JsValue> {
        let command: Command = serde_json::from_str(command_json).map_err(js_err)?;
        let mut effects = self.inner.dispatch(command);
        effects.extend(self.inner.process_messages());
        effects_json(&effects).map_err(js_err)
    }

    /// Hand over the bytes of a file the user picked.
    pub fn import_file(&mut self, format: &str, bytes: Vec<u8>) -> Result<String, JsValue> {
        let format = parse_format(format).map_err(js_err)?;
        let mut effects = self.inner.dispatch(Command::ImportFile { format, bytes });
        effects.extend(self.inner.process_messages());
        effects_json(&effects).map_err(js_err)
    }

    /// Effects from finished background work.
    pub fn poll(&mut self) -> Result<String, JsValue> {
        effects_json(&self.inner.process_messages()).map_err(js_err)
    }

    /// Features of `"drawing"`, `"import"` or `"wfs"` as GeoJSON.
    pub fn overlay_geojson(&self, layer: &str) -> Result<String, JsValue> {
        let kind = parse_overlay(layer).map_err(js_err)?;
        let features = self.inner.overlay_features(kind).map_err(js_err)?;
        write_geojson(&features).map_err(js_err)
    }

    /// Register a WFS layer from GeoJSON text (EPSG:4326).
    pub fn add_wfs_layer(
        &mut self,
        title: &str,
        geojson: &str,
        style_json: Option<String>,
    ) -> Result<(), JsValue> {
        let features = read_geojson_str(geojson).map_err(js_err)?;
        let style = parse_style(style_json.as_deref()).map_err(js_err)?.unwrap_or_default();
        self.inner.add_wfs_layer(title, features, style).map_err(js_err)?;
        Ok(())
    }

    /// Current view as JSON: projected centre, lon/lat centre, zoom and resolution.
    pub fn view_state(&self) -> String {
        let view = self.inner.view();
        let c = view.center();
        let (lon, lat) = view.center_lon_lat();
        json!({
            "center": [c.x, c.y],
            "center_lon_lat": [lon, lat],
            "zoom": view.zoom(),
            "resolution": view.resolution(),
            "projection": view.projection().identifier(),
        })
        .to_string()
    }

    /// Scale line as JSON, or `null` when it cannot be computed.
    pub fn scale_bar(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.scale_bar()).map_err(js_err)
    }

    /// Layer switcher rows and state as JSON.
    pub fn layer_switcher(&self) -> Result<String, JsValue> {
        let switcher = self.inner.layer_switcher();
        let value = json!({
            "tip_label": switcher.tip_label,
            "expanded": switcher.is_expanded(),
            "layers": switcher.entries(self.inner.base_layers()),
        });
        Ok(value.to_string())
    }

    /// Style of the active sketch as JSON, or `null` when idle.
    pub fn interaction_style(&self) -> Result<String, JsValue> {
        let style = self.inner.interaction().map(|d| d.sketch_style());
        serde_json::to_string(&style).map_err(js_err)
    }

    /// Tile URL of the visible base layer.
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        self.inner.base_layers().visible().tile_url(z, x, y)
    }
}

/// Fetch a WFS layer and return `{title, url, geojson, style}` as JSON,
/// ready for [`WasmViewer::add_wfs_layer`].
#[wasm_bindgen]
pub async fn fetch_wfs(url: String, style_json: Option<String>) -> Result<String, JsValue> {
    let style = parse_style(style_json.as_deref()).map_err(js_err)?;
    let client = WfsClient::new().map_err(js_err)?;
    let layer = client.fetch_layer(&url, style).await.map_err(js_err)?;
    tracing::info!("fetched WFS layer {}", layer.title);
    let geojson = write_geojson(&layer.features).map_err(js_err)?;
    Ok(json!({
        "title": layer.title,
        "url": layer.url,
        "geojson": geojson,
        "style": layer.style,
    })
    .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let c = parse_config("  ").unwrap();
        assert_eq!(c.zoom, 6.0);
        assert!(parse_config(r#"{"zoom": 99}"#).is_err());
    }

    #[test]
    fn format_and_overlay_names() {
        assert_eq!(parse_format("GeoJSON"), Ok(ImportFormat::GeoJson));
        assert_eq!(parse_format("zip"), Ok(ImportFormat::Shapefile));
        assert!(parse_format("kml").is_err());
        assert_eq!(parse_overlay("draw"), Ok(OverlayKind::Drawing));
        assert!(parse_overlay("base").is_err());
    }

    #[test]
    fn style_json_is_optional() {
        assert_eq!(parse_style(None), Ok(None));
        assert_eq!(parse_style(Some("")), Ok(None));
        let style = parse_style(Some(r#"{"fill": {"color": "red"}}"#)).unwrap().unwrap();
        assert_eq!(style.fill.map(|f| f.color).as_deref(), Some("red"));
        assert!(parse_style(Some("{")).is_err());
    }

    #[test]
    fn viewer_round_trip_without_js() {
        let mut viewer = WasmViewer::new("").unwrap();
        let effects = viewer.dispatch(r#"{"type":"zoom_in"}"#).unwrap();
        assert_eq!(effects, r#"[{"type":"set_zoom","zoom":7.0}]"#);

        let effects = viewer
            .import_file("geojson", br#"{"type":"Point","coordinates":[-6.84,34.02]}"#.to_vec())
            .unwrap();
        assert!(effects.contains("animate_view"));
        let fc: serde_json::Value =
            serde_json::from_str(&viewer.overlay_geojson("import").unwrap()).unwrap();
        assert_eq!(fc["features"].as_array().map(Vec::len), Some(1));

        let state: serde_json::Value = serde_json::from_str(&viewer.view_state()).unwrap();
        assert_eq!(state["projection"], "EPSG:3857");
        assert_eq!(viewer.tile_url(1, 0, 1), "https://tile.openstreetmap.org/1/0/1.png");

        assert_eq!(viewer.interaction_style().unwrap(), "null");
        viewer.dispatch(r#"{"type":"measure","kind":"length"}"#).unwrap();
        let style: serde_json::Value = serde_json::from_str(&viewer.interaction_style().unwrap()).unwrap();
        assert_eq!(style["stroke"]["color"], "blue");
    }
}
