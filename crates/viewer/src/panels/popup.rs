//! Attribute popup for clicked WFS features.

use serde_json::Value;

use geoview_core::Properties;

/// Key/value rows shown in a feature popup, in property order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupTable {
    pub rows: Vec<(String, String)>,
}

impl PopupTable {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            rows: props
                .iter()
                .map(|(k, v)| (k.clone(), display_value(v)))
                .collect(),
        }
    }

    /// Render as the HTML fragment the popup overlay displays.
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<strong>Données attributaires :</strong><br><table class=\"popup-table\">",
        );
        for (key, value) in &self.rows {
            html.push_str("<tr><td><strong>");
            html.push_str(&escape_html(key));
            html.push_str("</strong></td><td>");
            html.push_str(&escape_html(value));
            html.push_str("</td></tr>");
        }
        html.push_str("</table>");
        html
    }
}

/// Text shown for one attribute value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_keeps_property_order() {
        let props = json!({"zone": "A1", "area": 12.5, "active": true})
            .as_object()
            .cloned()
            .unwrap();
        let html = PopupTable::from_properties(&props).to_html();
        assert_eq!(
            html,
            "<strong>Données attributaires :</strong><br><table class=\"popup-table\">\
             <tr><td><strong>zone</strong></td><td>A1</td></tr>\
             <tr><td><strong>area</strong></td><td>12.5</td></tr>\
             <tr><td><strong>active</strong></td><td>true</td></tr>\
             </table>"
        );
    }

    #[test]
    fn values_are_displayed_and_escaped() {
        assert_eq!(display_value(&json!(null)), "null");
        assert_eq!(display_value(&json!([1, "b", 3])), "1,b,3");
        assert_eq!(display_value(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(escape_html("<b>&'\""), "&lt;b&gt;&amp;&#39;&quot;");

        let mut props = Properties::new();
        props.insert("<k>".into(), json!("x & y"));
        let html = PopupTable::from_properties(&props).to_html();
        assert!(html.contains("<strong>&lt;k&gt;</strong></td><td>x &amp; y</td>"));
    }

    #[test]
    fn empty_properties_render_empty_table() {
        let html = PopupTable::from_properties(&Properties::new()).to_html();
        assert!(html.ends_with("<table class=\"popup-table\"></table>"));
    }
}
