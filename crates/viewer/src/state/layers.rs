//! Base tile layers. Exactly one is visible at any time.

use crate::config::TileSourceConfig;

/// An XYZ tile source.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    pub title: String,
    pub url_template: String,
    pub attributions: Option<String>,
}

impl TileSource {
    /// Expand the `{z}`, `{x}` and `{y}` placeholders of the template.
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        self.url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl From<&TileSourceConfig> for TileSource {
    fn from(c: &TileSourceConfig) -> Self {
        Self {
            title: c.title.clone(),
            url_template: c.url.clone(),
            attributions: c.attributions.clone(),
        }
    }
}

/// The base layer catalogue with one visibility flag per layer.
#[derive(Debug, Clone)]
pub struct BaseLayers {
    sources: Vec<TileSource>,
    visible: Vec<bool>,
}

impl BaseLayers {
    /// Build from configuration. The first layer flagged visible wins; if
    /// none is flagged, the first layer is shown. Returns `None` when the
    /// catalogue is empty.
    pub fn from_config(configs: &[TileSourceConfig]) -> Option<Self> {
        if configs.is_empty() {
            return None;
        }
        let shown = configs.iter().position(|c| c.visible).unwrap_or(0);
        Some(Self {
            sources: configs.iter().map(TileSource::from).collect(),
            visible: (0..configs.len()).map(|i| i == shown).collect(),
        })
    }

    /// Show the layer titled `title` and hide every other one.
    /// Unknown titles leave the selection unchanged and return `false`.
    pub fn select(&mut self, title: &str) -> bool {
        let Some(idx) = self.sources.iter().position(|s| s.title == title) else {
            return false;
        };
        for (i, flag) in self.visible.iter_mut().enumerate() {
            *flag = i == idx;
        }
        true
    }

    pub fn visible(&self) -> &TileSource {
        let idx = self.visible.iter().position(|v| *v).unwrap_or(0);
        &self.sources[idx]
    }

    pub fn is_visible(&self, title: &str) -> bool {
        self.sources
            .iter()
            .zip(&self.visible)
            .any(|(s, v)| *v && s.title == title)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    /// Layers with their visibility, in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (&TileSource, bool)> {
        self.sources.iter().zip(self.visible.iter().copied())
    }

    pub fn titles(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.title.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    fn layers() -> BaseLayers {
        BaseLayers::from_config(&ViewerConfig::default().base_layers).unwrap()
    }

    #[test]
    fn starts_with_flagged_layer() {
        let l = layers();
        assert_eq!(l.visible().title, "OpenStreetMap");
        assert_eq!(l.visible_count(), 1);
    }

    #[test]
    fn select_is_exclusive() {
        let mut l = layers();
        for title in ["ESRI Satellite", "ESRI Streets", "ESRI Satellite", "OpenStreetMap"] {
            assert!(l.select(title));
            assert!(l.is_visible(title));
            assert_eq!(l.visible_count(), 1);
        }
        assert!(!l.select("Bing"));
        assert_eq!(l.visible().title, "OpenStreetMap");
    }

    #[test]
    fn none_flagged_shows_first() {
        let mut configs = ViewerConfig::default().base_layers;
        for c in &mut configs {
            c.visible = false;
        }
        let l = BaseLayers::from_config(&configs).unwrap();
        assert_eq!(l.visible().title, "OpenStreetMap");
        assert!(BaseLayers::from_config(&[]).is_none());
    }

    #[test]
    fn tile_url_expands_template() {
        let l = layers();
        assert_eq!(l.visible().tile_url(3, 4, 2), "https://tile.openstreetmap.org/3/4/2.png");
        let (esri, shown) = l.iter().nth(1).unwrap();
        assert!(!shown);
        assert!(esri.tile_url(3, 4, 2).ends_with("/tile/3/2/4"));
    }
}
