//! Vector layer styles (stroke, fill, point symbol).
//!
//! Colours are CSS colour strings; the host renderer interprets them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: String,
}

/// Circle symbol used for point geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    pub radius: f64,
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub stroke: Option<Stroke>,
    pub fill: Option<Fill>,
    pub image: Option<CircleStyle>,
}

impl Style {
    fn new(stroke: (&str, f64), fill: &str, point: Option<(f64, &str)>) -> Self {
        Self {
            stroke: Some(Stroke {
                color: stroke.0.to_string(),
                width: stroke.1,
            }),
            fill: Some(Fill {
                color: fill.to_string(),
            }),
            image: point.map(|(radius, color)| CircleStyle {
                radius,
                fill: Fill {
                    color: color.to_string(),
                },
            }),
        }
    }

    /// Freehand drawing layer: yellow.
    pub fn drawing() -> Self {
        Self::new(("#ffcc33", 2.0), "rgba(255, 255, 0, 0.3)", Some((7.0, "#ffcc33")))
    }

    /// Imported data layer: cyan.
    pub fn imported() -> Self {
        Self::new(("#00FFFF", 2.0), "rgba(0, 255, 255, 0.2)", Some((6.0, "#00FFFF")))
    }

    /// In-progress measurement sketch: blue.
    pub fn measurement() -> Self {
        Self::new(("blue", 2.0), "rgba(0, 0, 255, 0.1)", None)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(("#3399CC", 1.25), "rgba(255, 255, 255, 0.4)", Some((5.0, "rgba(255, 255, 255, 0.4)")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_style_json_fills_defaults() {
        let s: Style = serde_json::from_str(r##"{"stroke": {"color": "#f00", "width": 3}}"##).unwrap();
        assert_eq!(s.stroke.unwrap().width, 3.0);
        assert_eq!(s.fill, Style::default().fill);
    }

    #[test]
    fn measurement_style_has_no_point_symbol() {
        assert!(Style::measurement().image.is_none());
        assert!(Style::drawing().image.is_some());
    }
}
