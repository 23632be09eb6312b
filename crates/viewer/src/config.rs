//! Viewer configuration.
//!
//! Built in code or deserialized from a JSON string the host passes in.
//! Every field has a default so a partial document is enough.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// One selectable base layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSourceConfig {
    pub title: String,
    /// XYZ URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url: String,
    #[serde(default)]
    pub attributions: Option<String>,
    #[serde(default)]
    pub visible: bool,
}

impl TileSourceConfig {
    fn new(title: &str, url: &str, attributions: Option<&str>, visible: bool) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            attributions: attributions.map(str::to_string),
            visible,
        }
    }
}

/// Configuration for [`MapController`](crate::MapController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Initial view centre as `[lon, lat]` (degrees).
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Map viewport `[width, height]` in pixels.
    pub viewport: [f64; 2],
    pub base_layers: Vec<TileSourceConfig>,
    /// Padding `[top, right, bottom, left]` in pixels when fitting imports.
    pub fit_padding: [f64; 4],
    pub fit_duration_ms: u64,
    pub search_zoom: f64,
    pub animation_duration_ms: u64,
    /// Distance in pixels within which a click finishes a sketch.
    pub snap_tolerance_px: f64,
    /// Distance in pixels within which a click hits a feature.
    pub hit_tolerance_px: f64,
    /// Minimum scale bar width in pixels.
    pub scale_bar_min_width_px: f64,
    pub export_filename: String,
    pub layer_switcher_label: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            center: [-7.6, 33.6],
            zoom: 6.0,
            min_zoom: 0.0,
            max_zoom: 28.0,
            viewport: [1024.0, 768.0],
            base_layers: vec![
                TileSourceConfig::new(
                    "OpenStreetMap",
                    "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
                    Some("© OpenStreetMap contributors"),
                    true,
                ),
                TileSourceConfig::new(
                    "ESRI Satellite",
                    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                    Some("© Esri"),
                    false,
                ),
                TileSourceConfig::new(
                    "ESRI Streets",
                    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/{z}/{y}/{x}",
                    None,
                    false,
                ),
            ],
            fit_padding: [20.0; 4],
            fit_duration_ms: 1000,
            search_zoom: 14.0,
            animation_duration_ms: 1000,
            snap_tolerance_px: 12.0,
            hit_tolerance_px: 5.0,
            scale_bar_min_width_px: 64.0,
            export_filename: "export.geojson".to_string(),
            layer_switcher_label: "Couches".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the controller relies on.
    pub fn validate(&self) -> Result<()> {
        if self.base_layers.is_empty() {
            return Err(ViewerError::Config("at least one base layer is required".into()));
        }
        if !(self.min_zoom <= self.max_zoom) {
            return Err(ViewerError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom < self.min_zoom || self.zoom > self.max_zoom {
            return Err(ViewerError::Config(format!(
                "initial zoom {} outside [{}, {}]",
                self.zoom, self.min_zoom, self.max_zoom
            )));
        }
        let [w, h] = self.viewport;
        if !(w > 0.0 && h > 0.0) {
            return Err(ViewerError::Config(format!("viewport {w}x{h} must be positive")));
        }
        if !self.center.iter().all(|v| v.is_finite()) {
            return Err(ViewerError::Config("center must be finite".into()));
        }
        Ok(())
    }
}
