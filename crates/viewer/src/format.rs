//! Text formatting for measurements, coordinates and user input.

/// Format a length in metres: `"1.50 km"` above 1000 m, else `"500.00 m"`.
pub fn format_length(meters: f64) -> String {
    if meters > 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.2} m", meters)
    }
}

/// Format an area in square metres: km² above 1 000 000 m².
pub fn format_area(square_meters: f64) -> String {
    if square_meters > 1_000_000.0 {
        format!("{:.2} km\u{00b2}", square_meters / 1_000_000.0)
    } else {
        format!("{:.2} m\u{00b2}", square_meters)
    }
}

/// Cursor readout: `"lat, lon"` with six decimals.
pub fn format_coordinate(lon: f64, lat: f64) -> String {
    format!("{:.6}, {:.6}", lat, lon)
}

/// Parse one coordinate text field. Blank, unparsable and non-finite
/// values yield `None`.
pub fn parse_coordinate(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the longitude and latitude search fields together.
pub fn parse_coordinate_input(lon: &str, lat: &str) -> Option<(f64, f64)> {
    Some((parse_coordinate(lon)?, parse_coordinate(lat)?))
}
