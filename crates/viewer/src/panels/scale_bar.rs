//! Scale line: a bar of "nice" ground length for the current resolution.

use serde::Serialize;

/// A computed scale line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleBar {
    /// Bar width in screen pixels.
    pub width_px: f64,
    /// Ground length the bar represents, in metres.
    pub meters: f64,
    pub label: String,
}

impl ScaleBar {
    /// Build a bar at least `min_width_px` wide for `meters_per_px` ground
    /// resolution. Returns `None` for a non-positive resolution.
    pub fn compute(meters_per_px: f64, min_width_px: f64) -> Option<Self> {
        if !(meters_per_px > 0.0 && meters_per_px.is_finite()) || min_width_px <= 0.0 {
            return None;
        }
        let raw = meters_per_px * min_width_px;

        // Round up to 1, 2 or 5 times a power of ten.
        let mut magnitude = 10.0_f64.powf(raw.log10().floor());
        let nice = loop {
            if let Some(step) = [1.0, 2.0, 5.0].iter().map(|d| d * magnitude).find(|v| *v >= raw) {
                break step;
            }
            magnitude *= 10.0;
        };

        let label = if nice >= 1000.0 {
            format!("{} km", trim_float(nice / 1000.0))
        } else if nice >= 1.0 {
            format!("{:.0} m", nice)
        } else {
            format!("{} m", trim_float(nice))
        };

        Some(Self {
            width_px: nice / meters_per_px,
            meters: nice,
            label,
        })
    }
}

fn trim_float(v: f64) -> String {
    let s = format!("{:.3}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
