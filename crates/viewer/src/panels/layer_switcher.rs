//! Collapsible layer switcher control.

use serde::Serialize;

use crate::state::BaseLayers;

/// One row of the switcher: a base layer radio button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry {
    pub title: String,
    pub visible: bool,
}

/// Layer switcher panel, collapsed by default.
#[derive(Debug, Clone)]
pub struct LayerSwitcher {
    /// Tooltip on the toggle button.
    pub tip_label: String,
    expanded: bool,
}

impl LayerSwitcher {
    pub fn new(tip_label: impl Into<String>) -> Self {
        Self {
            tip_label: tip_label.into(),
            expanded: false,
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Rows to display, in catalogue order.
    pub fn entries(&self, base: &BaseLayers) -> Vec<LayerEntry> {
        base.iter()
            .map(|(source, visible)| LayerEntry {
                title: source.title.clone(),
                visible,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    #[test]
    fn toggles_and_lists_layers() {
        let mut sw = LayerSwitcher::new("Couches");
        assert!(!sw.is_expanded());
        assert!(sw.toggle());
        assert!(!sw.toggle());

        let mut base = BaseLayers::from_config(&ViewerConfig::default().base_layers).unwrap();
        base.select("ESRI Streets");
        let rows = sw.entries(&base);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().filter(|r| r.visible).count(), 1);
        assert!(rows[2].visible);
    }
}
